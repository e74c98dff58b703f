use thiserror::Error;

use crate::column_filter::FilterKind;

/// Configuration errors reported at the API boundary.
///
/// Row evaluation never fails; these only come from setting filters up.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("column {column} is out of range (grid has {column_count} columns)")]
    ColumnOutOfRange { column: usize, column_count: usize },
    #[error("column {column} is not filterable")]
    NotFilterable { column: usize },
    #[error("column {column} does not accept {kind} filters")]
    FilterTypeNotAllowed { column: usize, kind: FilterKind },
    #[error("invalid filter definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}
