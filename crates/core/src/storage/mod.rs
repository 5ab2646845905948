//! Flat key-value persistence for lists and settings.

mod file_store;
mod memory_store;
mod storage_traits;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use storage_traits::KeyValueStore;
