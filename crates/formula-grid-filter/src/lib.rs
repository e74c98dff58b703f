//! `formula-grid-filter` implements column filtering for Formula's data grids.
//!
//! Each filterable column holds at most one filter: a [`ConditionFilter`] (two comparisons
//! combined with AND/OR) or a [`ValueFilter`] (an allow-set of display texts). A
//! [`FilterHost`] composes every column's filter into one row-visibility predicate, and a
//! [`ValueEditorModel`] lists the distinct values of a column that remain reachable under the
//! filters on the *other* columns.
//!
//! The grid itself is abstracted behind [`RowSource`]; [`TableSource`] is an in-memory
//! implementation. Evaluation is synchronous and holds no cache, so results always reflect the
//! source and filters at the time of the call.

mod column_filter;
mod condition;
mod condition_filter;
pub mod definition;
mod editor;
mod error;
mod host;
mod locale;
mod settings;
mod source;
mod table;
mod value;
mod value_filter;

pub use column_filter::{ActiveFilter, ColumnFilter, FilterKind};
pub use condition::{Comparand, CompareOptions, Condition, Operator};
pub use condition_filter::ConditionFilter;
pub use definition::{ColumnFilterDefinition, FilterDefinition};
pub use editor::{ValueCandidate, ValueEditorModel, ValueList};
pub use error::FilterError;
pub use host::FilterHost;
pub use locale::ValueLocaleConfig;
pub use settings::{FilterSettings, FilterType, SearchMode};
pub use source::{CellRange, ColumnRef, DataMap, GridId, MapDataMap, RowSource};
pub use table::{TableColumn, TableError, TableSource};
pub use value::{CellValue, DataType};
pub use value_filter::{ValueFilter, DEFAULT_MAX_DISTINCT_VALUES};
