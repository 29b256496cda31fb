use serde_json::Value;
use tracing::warn;

use super::message::ChatMessage;
use crate::analysis::{
    extract_records, group_chart, group_records, pivot_table, preview_table, resolve_column,
    Record,
};
use crate::config::PortalConfig;
use crate::fixtures::FixtureError;
use crate::knowledge::DatasetDescriptor;

pub const NO_DATA: &str = "No data found.";

/// Fetch-backed work a turn can request against one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOperation {
    Count,
    Preview,
    Pivot { field: String },
    Chart { field: String },
    PivotAndChart { field: String },
}

impl DataOperation {
    pub fn failure_text(&self) -> &'static str {
        match self {
            DataOperation::Count => "Unable to count records.",
            DataOperation::Preview => "Unable to preview data.",
            DataOperation::Pivot { .. } | DataOperation::PivotAndChart { .. } => {
                "Unable to group data."
            }
            DataOperation::Chart { .. } => "Unable to build chart.",
        }
    }

    pub fn group_field(&self) -> Option<&str> {
        match self {
            DataOperation::Pivot { field }
            | DataOperation::Chart { field }
            | DataOperation::PivotAndChart { field } => Some(field),
            DataOperation::Count | DataOperation::Preview => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub preview_rows: usize,
    pub pie_max_groups: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&PortalConfig::default())
    }
}

impl From<&PortalConfig> for RenderSettings {
    fn from(config: &PortalConfig) -> Self {
        Self {
            preview_rows: config.preview_rows,
            pie_max_groups: config.pie_max_groups,
        }
    }
}

/// Turns a fetched fixture into the single bot reply for `operation`.
///
/// Fetch failures become the operation's apology; empty or non-tabular
/// documents become "No data found."
pub fn render(
    operation: &DataOperation,
    dataset: &DatasetDescriptor,
    fetched: Result<Value, FixtureError>,
    settings: RenderSettings,
) -> ChatMessage {
    let document = match fetched {
        Ok(document) => document,
        Err(err) => {
            warn!(%err, dataset = dataset.key, "Fixture fetch failed");
            return ChatMessage::bot(operation.failure_text());
        }
    };

    let records = extract_records(document);
    if records.is_empty() {
        return ChatMessage::bot(NO_DATA);
    }

    let label = dataset.label();
    match operation {
        DataOperation::Count => {
            ChatMessage::bot(format!("{} has {} records.", label, records.len()))
        }
        DataOperation::Preview => {
            let shown = records.len().min(settings.preview_rows);
            ChatMessage::bot(format!(
                "Preview of {} (first {} records):\n\n{}",
                label,
                shown,
                preview_table(&records, settings.preview_rows)
            ))
        }
        DataOperation::Pivot { field } => match resolve_column(&records, field) {
            Some(column) => ChatMessage::bot(format!(
                "{} grouped by {}:\n\n{}\n\n{}",
                label,
                column,
                pivot_table(&column, &group_records(&records, &column, None)),
                regroup_hint(dataset)
            )),
            None => missing_field(dataset, field),
        },
        DataOperation::Chart { field } => match resolve_column(&records, field) {
            Some(column) => chart_message(dataset, &records, &column, None, settings),
            None => missing_field(dataset, field),
        },
        DataOperation::PivotAndChart { field } => match resolve_column(&records, field) {
            Some(column) => {
                let table = pivot_table(&column, &group_records(&records, &column, None));
                chart_message(dataset, &records, &column, Some(table), settings)
            }
            None => missing_field(dataset, field),
        },
    }
}

fn chart_message(
    dataset: &DatasetDescriptor,
    records: &[Record],
    column: &str,
    table: Option<String>,
    settings: RenderSettings,
) -> ChatMessage {
    let chart = group_chart(records, column, settings.pie_max_groups);
    let heading = format!(
        "📊 {} for {} ({} groups).",
        chart.title().unwrap_or(column),
        dataset.label(),
        chart.labels().len()
    );

    let text = match table {
        Some(table) => format!("{}\n\n{}\n\n{}", heading, table, regroup_hint(dataset)),
        None => format!("{}\n\n{}", heading, regroup_hint(dataset)),
    };

    ChatMessage::bot(text).with_chart(chart)
}

fn regroup_hint(dataset: &DatasetDescriptor) -> String {
    format!(
        "Reply with another field to regroup: {}",
        dataset.key_fields.join(", ")
    )
}

fn missing_field(dataset: &DatasetDescriptor, field: &str) -> ChatMessage {
    ChatMessage::bot(format!(
        "I couldn’t find a field named '{}' in {}. Try one of: {}",
        field,
        dataset.label(),
        dataset.key_fields.join(", ")
    ))
}
