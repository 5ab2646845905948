//! Export and import of all lists and settings as a single JSON document.

use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ImportValidationError, Result};
use crate::lists::{ListRepositoryTrait, StockList, UserSettings};
use crate::symbols::pluralize;

pub const EXPORT_VERSION: u32 = 2;

/// Versioned snapshot of every list plus settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: u32,
    /// ISO-8601 with milliseconds, e.g. "2024-01-01T12:00:00.000Z"
    pub exported_at: String,
    pub lists: Vec<StockList>,
    pub settings: UserSettings,
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub list_count: usize,
    pub stock_count: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!(
            "Imported {} with {}",
            pluralize(self.list_count, "list"),
            pluralize(self.stock_count, "stock")
        )
    }
}

/// Serialize lists and settings to a pretty-printed export document.
pub fn export_to_json(
    lists: &[StockList],
    settings: &UserSettings,
    now: DateTime<Utc>,
) -> Result<String> {
    let data = ExportData {
        version: EXPORT_VERSION,
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        lists: lists.to_vec(),
        settings: settings.clone(),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

fn invalid(message: impl Into<String>) -> ImportValidationError {
    ImportValidationError::new(message)
}

/// Arrays count as objects here, matching how exports were always checked.
fn is_object_like(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|o| o.get(key))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Render a JSON value the way it reads in an error message.
fn render(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| render(Some(v)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn validate_list(index: usize, list: &Value) -> std::result::Result<(), ImportValidationError> {
    if !is_object_like(list) {
        return Err(invalid(format!("Invalid list at index {}", index)));
    }

    let missing =
        |name: &str| invalid(format!("Invalid or missing {} in list at index {}", name, index));

    if non_empty_str(field(list, "id")).is_none() {
        return Err(missing("id"));
    }
    let Some(name) = non_empty_str(field(list, "name")) else {
        return Err(missing("name"));
    };
    if !field(list, "icon").is_some_and(Value::is_string) {
        return Err(missing("icon"));
    }
    let Some(symbols) = field(list, "symbols").and_then(Value::as_array) else {
        return Err(missing("symbols array"));
    };
    if !field(list, "isPortfolio").is_some_and(Value::is_boolean) {
        return Err(missing("isPortfolio"));
    }
    if !field(list, "createdAt").is_some_and(Value::is_number) {
        return Err(missing("createdAt"));
    }
    if !field(list, "updatedAt").is_some_and(Value::is_number) {
        return Err(missing("updatedAt"));
    }

    for (symbol_index, item) in symbols.iter().enumerate() {
        if !is_object_like(item) {
            return Err(invalid(format!(
                "Invalid symbol at index {} in list \"{}\"",
                symbol_index, name
            )));
        }
        let Some(symbol) = non_empty_str(field(item, "symbol")) else {
            return Err(invalid(format!(
                "Invalid or missing symbol at index {} in list \"{}\"",
                symbol_index, name
            )));
        };
        for key in ["units", "costBasis"] {
            if field(item, key).is_some_and(|v| !v.is_number()) {
                return Err(invalid(format!(
                    "Invalid {} at symbol \"{}\" in list \"{}\"",
                    key, symbol, name
                )));
            }
        }
    }

    Ok(())
}

/// Parse and strictly validate an export document, failing on the first
/// problem found.
pub fn validate_import_data(json: &str) -> std::result::Result<ExportData, ImportValidationError> {
    let mut data: Value =
        serde_json::from_str(json).map_err(|_| invalid("Invalid JSON format"))?;

    if !is_object_like(&data) {
        return Err(invalid("Invalid data structure"));
    }

    let version = field(&data, "version");
    if version.and_then(Value::as_f64) != Some(f64::from(EXPORT_VERSION)) {
        return Err(invalid(format!(
            "Unsupported version: {}. Expected version 2.",
            render(version)
        )));
    }

    if !field(&data, "exportedAt").is_some_and(Value::is_string) {
        return Err(invalid("Missing or invalid exportedAt timestamp"));
    }

    let Some(lists) = field(&data, "lists").and_then(Value::as_array) else {
        return Err(invalid("Missing or invalid lists array"));
    };
    for (index, list) in lists.iter().enumerate() {
        validate_list(index, list)?;
    }

    let settings = field(&data, "settings").filter(|s| is_object_like(s));
    let Some(settings) = settings else {
        return Err(invalid("Missing or invalid settings object"));
    };
    match field(settings, "defaultListId") {
        Some(Value::Null) | Some(Value::String(_)) => {}
        _ => return Err(invalid("Invalid defaultListId in settings")),
    }

    normalize_integers(&mut data);
    serde_json::from_value(data).map_err(|_| invalid("Invalid data structure"))
}

/// Rewrite float-encoded integer fields (`2.0`, `1700000000000.5`) as
/// integers so they deserialize into `u32`/`i64`. Fractions are truncated.
fn normalize_integers(data: &mut Value) {
    fn truncate(value: &mut Value) {
        if value.is_i64() || value.is_u64() {
            return;
        }
        if let Some(f) = value.as_f64() {
            *value = Value::from(f.trunc() as i64);
        }
    }

    if let Some(version) = data.get_mut("version") {
        truncate(version);
    }
    if let Some(lists) = data.get_mut("lists").and_then(Value::as_array_mut) {
        for list in lists {
            for key in ["createdAt", "updatedAt"] {
                if let Some(stamp) = list.get_mut(key) {
                    truncate(stamp);
                }
            }
        }
    }
}

/// Replace all lists and settings with the imported data.
pub async fn import_data(
    repository: &dyn ListRepositoryTrait,
    data: &ExportData,
) -> Result<ImportSummary> {
    repository.save_lists(&data.lists).await?;
    repository.save_settings(&data.settings).await?;

    let summary = ImportSummary {
        list_count: data.lists.len(),
        stock_count: data.lists.iter().map(|l| l.symbols.len()).sum(),
    };
    info!("{}", summary.message());
    Ok(summary)
}
