//! Core error types for Stockwatch.
//!
//! Storage backends convert their failures into [`StorageError`] so the list
//! service stays backend-agnostic.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for list, storage and import operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportValidationError),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("{symbol} is already in \"{list}\"")]
    DuplicateSymbol { symbol: String, list: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a valid store document.
    #[error("Corrupt store: {0}")]
    Corrupt(String),

    /// The store's lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A rejected import document. The message is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ImportValidationError(pub String);

impl ImportValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::Io(err))
    }
}
