use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::fixtures::FixtureSource;
use crate::knowledge::{KnowledgeMap, SourceKind};

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Metadata-only view of a requestable dataset, API, or report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, alias = "key")]
    pub id: Option<Value>,
    #[serde(alias = "label")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub columns: Vec<CatalogColumn>,
}

impl CatalogItem {
    pub fn category(&self) -> &str {
        self.category
            .as_deref()
            .filter(|category| !category.trim().is_empty())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn id_text(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Columns whose name, type, or description contain `term`; every column when none do.
    pub fn matching_columns(&self, term: &str) -> Vec<&CatalogColumn> {
        let needle = term.trim().to_lowercase();
        let matches: Vec<&CatalogColumn> = self
            .columns
            .iter()
            .filter(|column| {
                [
                    Some(column.name.as_str()),
                    column.kind.as_deref(),
                    column.description.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&needle))
            })
            .collect();

        if needle.is_empty() || matches.is_empty() {
            self.columns.iter().collect()
        } else {
            matches
        }
    }
}

/// Loads one restricted source, accepting a bare array or an `items`/`reports` wrapper.
pub async fn load_items(source: &dyn FixtureSource, kind: SourceKind) -> anyhow::Result<Vec<CatalogItem>> {
    let restricted = KnowledgeMap::restricted(kind);
    let document = source
        .fetch(restricted.path)
        .await
        .with_context(|| format!("Failed to load {kind} fixture"))?;

    let items = parse_items(document);
    info!(%kind, count = items.len(), "Loaded restricted source");
    Ok(items)
}

fn parse_items(document: Value) -> Vec<CatalogItem> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut wrapper) => ["items", "reports"]
            .iter()
            .find_map(|key| match wrapper.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<CatalogItem>(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(%err, "Skipping malformed catalog entry");
                None
            }
        })
        .collect()
}

/// Keeps items whose name or category contains `term`, ignoring case. A blank term keeps all.
pub fn filter_items(items: Vec<CatalogItem>, term: &str) -> Vec<CatalogItem> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item.category().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Items bucketed by category; categories and names sort alphabetically.
pub fn by_category(items: Vec<CatalogItem>) -> BTreeMap<String, Vec<CatalogItem>> {
    let mut grouped: BTreeMap<String, Vec<CatalogItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.category().to_string()).or_default().push(item);
    }
    for items in grouped.values_mut() {
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
    grouped
}
