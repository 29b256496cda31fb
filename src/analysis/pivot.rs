use std::collections::HashMap;

use super::chart::ChartPayload;
use super::markdown::pipe_table;
use super::records::{cell_text, columns, first_numeric_column, numeric_value, Record};

/// Label used for records where the grouping field is missing or empty.
pub const BLANK_GROUP: &str = "(blank)";

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub value: String,
    pub count: usize,
    pub total: f64,
}

/// Groups records by `field` in first-seen order, counting rows and summing `measure`.
pub fn group_records(records: &[Record], field: &str, measure: Option<&str>) -> Vec<GroupSummary> {
    let mut groups: Vec<GroupSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let mut value = cell_text(record.get(field));
        if value.trim().is_empty() {
            value = BLANK_GROUP.to_string();
        }

        let slot = *index.entry(value.clone()).or_insert_with(|| {
            groups.push(GroupSummary {
                value,
                count: 0,
                total: 0.0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        if let Some(measure) = measure {
            group.total += record.get(measure).and_then(numeric_value).unwrap_or(0.0);
        }
    }

    groups
}

/// Two-column pivot summary: field value and record count.
pub fn pivot_table(field: &str, groups: &[GroupSummary]) -> String {
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|group| vec![group.value.clone(), group.count.to_string()])
        .collect();
    pipe_table(&[field.to_string(), "Count".to_string()], &rows)
}

/// First `limit` records as a pipe table keyed by the first record's columns.
pub fn preview_table(records: &[Record], limit: usize) -> String {
    let headers = columns(records);
    let rows: Vec<Vec<String>> = records
        .iter()
        .take(limit)
        .map(|record| {
            headers
                .iter()
                .map(|column| cell_text(record.get(column)))
                .collect()
        })
        .collect();
    pipe_table(&headers, &rows)
}

/// Sums the first numeric column per group, or counts rows when there is none.
pub fn group_chart(records: &[Record], field: &str, pie_max_groups: usize) -> ChartPayload {
    let measure = first_numeric_column(records, field);
    let groups = group_records(records, field, measure.as_deref());

    let series = groups
        .into_iter()
        .map(|group| {
            let value = if measure.is_some() {
                group.total
            } else {
                group.count as f64
            };
            (group.value, value)
        })
        .collect();

    let title = match &measure {
        Some(measure) => format!("Sum of {measure} by {field}"),
        None => format!("Count by {field}"),
    };

    ChartPayload::from_series(series, pie_max_groups).with_title(title)
}
