use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

/// Pulls flat records out of a fixture document.
///
/// Accepts a bare array or an `{ "items": [...] }` wrapper. Non-object
/// entries are skipped; an empty result means "no data".
pub fn extract_records(document: Value) -> Vec<Record> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut wrapper) => match wrapper.remove("items") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}

/// Display form of a cell; missing and null values render empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Native numbers, or strings that parse as a finite number.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite()),
        _ => None,
    }
}

/// Column order of the first record, which fixtures share across rows.
pub fn columns(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

/// Finds the fixture column matching `candidate`, ignoring case.
pub fn resolve_column(records: &[Record], candidate: &str) -> Option<String> {
    columns(records)
        .into_iter()
        .find(|column| column.eq_ignore_ascii_case(candidate))
}

/// First column other than `exclude` whose first-row value is numeric.
pub fn first_numeric_column(records: &[Record], exclude: &str) -> Option<String> {
    let first = records.first()?;
    first
        .iter()
        .find(|(column, value)| column.as_str() != exclude && numeric_value(value).is_some())
        .map(|(column, _)| column.clone())
}
