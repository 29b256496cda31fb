use std::fmt;

use crate::knowledge::DatasetDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Help,
    Catalog,
    ListDatasets,
    ListFields,
    Count,
    Chart,
    Group,
    Dataset,
    Unknown,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IntentKind::Help => "help",
            IntentKind::Catalog => "catalog",
            IntentKind::ListDatasets => "list_datasets",
            IntentKind::ListFields => "list_fields",
            IntentKind::Count => "count",
            IntentKind::Chart => "chart",
            IntentKind::Group => "group",
            IntentKind::Dataset => "dataset",
            IntentKind::Unknown => "unknown",
        };

        write!(f, "{}", label)
    }
}

/// Classified purpose of one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Help,
    Catalog,
    ListDatasets,
    ListFields,
    Count,
    Chart { group_field: Option<String> },
    Group { group_field: Option<String> },
    Dataset,
    Unknown,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Help => IntentKind::Help,
            Intent::Catalog => IntentKind::Catalog,
            Intent::ListDatasets => IntentKind::ListDatasets,
            Intent::ListFields => IntentKind::ListFields,
            Intent::Count => IntentKind::Count,
            Intent::Chart { .. } => IntentKind::Chart,
            Intent::Group { .. } => IntentKind::Group,
            Intent::Dataset => IntentKind::Dataset,
            Intent::Unknown => IntentKind::Unknown,
        }
    }

    #[allow(dead_code)]
    pub fn group_field(&self) -> Option<&str> {
        match self {
            Intent::Chart { group_field } | Intent::Group { group_field } => group_field.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}

/// Prior-turn state the interpreter may fall back on.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentContext {
    pub last_dataset: Option<&'static DatasetDescriptor>,
}

impl IntentContext {
    #[allow(dead_code)]
    pub fn with_dataset(dataset: &'static DatasetDescriptor) -> Self {
        Self {
            last_dataset: Some(dataset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResult {
    pub intent: Intent,
    pub dataset: Option<&'static DatasetDescriptor>,
    pub response: String,
    pub fetch_path: Option<String>,
}

impl IntentResult {
    pub(crate) fn reply(intent: Intent, response: impl Into<String>) -> Self {
        Self {
            intent,
            dataset: None,
            response: response.into(),
            fetch_path: None,
        }
    }

    pub(crate) fn for_dataset(
        intent: Intent,
        dataset: &'static DatasetDescriptor,
        response: impl Into<String>,
    ) -> Self {
        Self {
            intent,
            dataset: Some(dataset),
            response: response.into(),
            fetch_path: None,
        }
    }

    pub(crate) fn with_fetch_path(mut self, path: impl Into<String>) -> Self {
        self.fetch_path = Some(path.into());
        self
    }

    #[allow(dead_code)]
    pub fn kind(&self) -> IntentKind {
        self.intent.kind()
    }

    pub fn dataset_key(&self) -> Option<&'static str> {
        self.dataset.map(|dataset| dataset.key)
    }
}
