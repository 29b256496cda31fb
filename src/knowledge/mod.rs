pub mod aliases;
pub mod registry;

pub use aliases::DATASET_ALIASES;
pub use registry::{DatasetDescriptor, KnowledgeMap, SourceKind};

/// Human form of a registry key: underscores become spaces.
pub fn human_label(key: &str) -> String {
    key.replace('_', " ")
}
