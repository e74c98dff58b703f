use std::collections::HashMap;

use crate::column_filter::{ColumnFilter, FilterKind};
use crate::condition_filter::ConditionFilter;
use crate::editor::ValueEditorModel;
use crate::error::FilterError;
use crate::settings::{FilterSettings, FilterType};
use crate::source::{ColumnRef, GridId, RowSource};
use crate::value_filter::ValueFilter;

/// Owns one [`ColumnFilter`] per filtered column and composes them into a single row-visibility
/// predicate over a [`RowSource`].
///
/// The host keeps no evaluation cache: every query reads the source and the filters as they are
/// at that moment.
#[derive(Debug)]
pub struct FilterHost<S> {
    source: S,
    settings: FilterSettings,
    filters: HashMap<usize, ColumnFilter>,
    filter_types: HashMap<usize, FilterType>,
}

impl<S: RowSource> FilterHost<S> {
    pub fn new(source: S) -> Self {
        Self::with_settings(source, FilterSettings::default())
    }

    pub fn with_settings(source: S, settings: FilterSettings) -> Self {
        Self {
            source,
            settings,
            filters: HashMap::new(),
            filter_types: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access for live edits. Filters are re-evaluated on the next query.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut FilterSettings {
        &mut self.settings
    }

    pub fn grid_id(&self) -> GridId {
        self.source.grid_id()
    }

    pub fn column_ref(&self, column: usize) -> ColumnRef {
        ColumnRef::new(self.grid_id(), column)
    }

    pub fn is_column_filterable(&self, column: usize) -> bool {
        column < self.source.column_count() && self.source.is_column_filterable(column)
    }

    pub(crate) fn check_column(&self, column: usize, kind: FilterKind) -> Result<(), FilterError> {
        let column_count = self.source.column_count();
        if column >= column_count {
            return Err(FilterError::ColumnOutOfRange {
                column,
                column_count,
            });
        }
        if !self.source.is_column_filterable(column) {
            return Err(FilterError::NotFilterable { column });
        }
        if !self.filter_type(column).allows(kind) {
            return Err(FilterError::FilterTypeNotAllowed { column, kind });
        }
        Ok(())
    }

    pub fn filter_type(&self, column: usize) -> FilterType {
        self.filter_types
            .get(&column)
            .copied()
            .unwrap_or(self.settings.default_filter_type)
    }

    /// Restrict the filter kinds `column` accepts. An existing filter of a kind that is no
    /// longer allowed is cleared.
    pub fn set_filter_type(
        &mut self,
        column: usize,
        filter_type: FilterType,
    ) -> Result<(), FilterError> {
        self.check_column(column, FilterKind::None)?;
        self.filter_types.insert(column, filter_type);
        if let Some(slot) = self.filters.get(&column) {
            if !filter_type.allows(slot.kind()) {
                log::debug!(
                    "clearing {} filter on column {column}: kind no longer allowed",
                    slot.kind()
                );
                self.filters.remove(&column);
            }
        }
        Ok(())
    }

    pub fn column_filter(&self, column: usize) -> Option<&ColumnFilter> {
        self.filters.get(&column)
    }

    pub(crate) fn slot_mut(&mut self, column: usize) -> &mut ColumnFilter {
        let column_ref = self.column_ref(column);
        self.filters
            .entry(column)
            .or_insert_with(|| ColumnFilter::new(column_ref))
    }

    /// Switch `column` to a condition filter (keeping an existing one) and return it.
    pub fn edit_condition(&mut self, column: usize) -> Result<&mut ConditionFilter, FilterError> {
        self.check_column(column, FilterKind::Condition)?;
        Ok(self.slot_mut(column).edit_condition())
    }

    /// Switch `column` to a value filter (keeping an existing one) and return it.
    pub fn edit_value(&mut self, column: usize) -> Result<&mut ValueFilter, FilterError> {
        self.check_column(column, FilterKind::Value)?;
        let max = self.settings.max_distinct_values;
        let sort_values = self.settings.sort_values;
        let slot = self.slot_mut(column);
        let was_value = slot.kind() == FilterKind::Value;
        let filter = slot.edit_value(max);
        if !was_value {
            filter.sort_values = sort_values;
        }
        Ok(filter)
    }

    /// Install a prebuilt filter slot, replacing whatever the column held.
    ///
    /// The slot keeps its own column reference; a slot built for another grid fails closed
    /// when evaluated.
    pub fn insert_column_filter(&mut self, filter: ColumnFilter) -> Result<(), FilterError> {
        let column = filter.column().index;
        self.check_column(column, filter.kind())?;
        if filter.column().grid != self.grid_id() {
            log::debug!(
                "installing filter from grid {:?} on column {column} of grid {:?}",
                filter.column().grid,
                self.grid_id()
            );
        }
        self.filters.insert(column, filter);
        Ok(())
    }

    pub fn clear(&mut self, column: usize) {
        self.filters.remove(&column);
    }

    pub fn clear_all(&mut self) {
        self.filters.clear();
    }

    /// `true` when any column filter can hide rows.
    pub fn is_active(&self) -> bool {
        self.filters.values().any(ColumnFilter::is_active)
    }

    /// Columns whose filter can hide rows, in ascending order.
    pub fn active_columns(&self) -> Vec<usize> {
        let mut columns: Vec<usize> = self
            .filters
            .iter()
            .filter(|(_, f)| f.is_active())
            .map(|(c, _)| *c)
            .collect();
        columns.sort_unstable();
        columns
    }

    pub(crate) fn filters(&self) -> impl Iterator<Item = (usize, &ColumnFilter)> {
        self.filters.iter().map(|(c, f)| (*c, f))
    }

    pub(crate) fn replace_filters(&mut self, filters: HashMap<usize, ColumnFilter>) {
        self.filters = filters;
    }

    /// A row is visible only if it passes every column filter.
    pub fn row_passes(&self, row: usize) -> bool {
        let options = self.settings.compare_options();
        self.filters
            .values()
            .all(|f| f.apply(&self.source, row, &options))
    }

    /// Like [`Self::row_passes`] but ignoring `column`'s own filter.
    pub fn row_passes_except(&self, row: usize, column: usize) -> bool {
        let options = self.settings.compare_options();
        self.filters
            .iter()
            .filter(|(c, _)| **c != column)
            .all(|(_, f)| f.apply(&self.source, row, &options))
    }

    pub fn visible_rows(&self) -> Vec<usize> {
        (0..self.source.row_count())
            .filter(|&row| self.row_passes(row))
            .collect()
    }

    pub fn hidden_rows(&self) -> Vec<usize> {
        (0..self.source.row_count())
            .filter(|&row| !self.row_passes(row))
            .collect()
    }

    /// Open a value editor for `column`.
    pub fn value_editor(&mut self, column: usize) -> Result<ValueEditorModel<'_, S>, FilterError> {
        self.check_column(column, FilterKind::Value)?;
        Ok(ValueEditorModel::new(self, column))
    }
}
