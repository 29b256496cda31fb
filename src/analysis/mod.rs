pub mod chart;
pub mod markdown;
pub mod pivot;
pub mod records;

pub use chart::{ChartKind, ChartPayload};
pub use pivot::{group_chart, group_records, pivot_table, preview_table};
pub use records::{extract_records, resolve_column, Record};
