use std::collections::BTreeSet;

use crate::source::{ColumnRef, RowSource};

/// Default cap on the number of distinct values offered by a value editor.
pub const DEFAULT_MAX_DISTINCT_VALUES: usize = 250;

/// Explicit allow-set of display texts for one column.
///
/// An empty `show_values` set means the filter is unfiltered: every row passes.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFilter {
    pub column: ColumnRef,
    pub show_values: BTreeSet<String>,
    /// Free-text search narrowing the editor's candidate list. Does not affect [`Self::apply`].
    pub filter_text: String,
    pub max_distinct_values: usize,
    /// Sort editor candidates by raw value rather than by first appearance.
    pub sort_values: bool,
}

impl ValueFilter {
    #[must_use]
    pub fn new(column: ColumnRef) -> Self {
        Self {
            column,
            show_values: BTreeSet::new(),
            filter_text: String::new(),
            max_distinct_values: DEFAULT_MAX_DISTINCT_VALUES,
            sort_values: true,
        }
    }

    #[must_use]
    pub fn with_show_values<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.show_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.show_values.is_empty()
    }

    pub fn clear(&mut self) {
        self.show_values.clear();
        self.filter_text.clear();
    }

    /// Whether `row` passes: its display text is one of `show_values`.
    ///
    /// Fails closed when `source` is not the grid this filter was created for.
    pub fn apply<S: RowSource + ?Sized>(&self, source: &S, row: usize) -> bool {
        if source.grid_id() != self.column.grid {
            log::debug!(
                "value filter for column {} of grid {:?} evaluated against grid {:?}",
                self.column.index,
                self.column.grid,
                source.grid_id()
            );
            return false;
        }
        if self.show_values.is_empty() {
            return true;
        }
        self.show_values
            .contains(&source.display_text(row, self.column.index))
    }
}
