use serde::{Deserialize, Serialize};

use crate::locale::ValueLocaleConfig;
use crate::value::{CellValue, DataType};

/// Identity of the grid instance a filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridId(pub u64);

/// A column of a specific grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub grid: GridId,
    pub index: usize,
}

impl ColumnRef {
    #[must_use]
    pub const fn new(grid: GridId, index: usize) -> Self {
        Self { grid, index }
    }
}

/// A rectangular block of merged cells (inclusive bounds).
///
/// Only the top-left cell represents the block for filtering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub top_row: usize,
    pub left_col: usize,
    pub bottom_row: usize,
    pub right_col: usize,
}

impl CellRange {
    #[must_use]
    pub const fn new(top_row: usize, left_col: usize, bottom_row: usize, right_col: usize) -> Self {
        Self {
            top_row,
            left_col,
            bottom_row,
            right_col,
        }
    }

    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.top_row..=self.bottom_row).contains(&row)
            && (self.left_col..=self.right_col).contains(&col)
    }

    #[must_use]
    pub fn is_representative(&self, row: usize, col: usize) -> bool {
        self.top_row == row && self.left_col == col
    }
}

/// Maps raw cell values to the text a grid displays for them (e.g. ids to names).
pub trait DataMap {
    /// Display value for `raw`, or `None` when the map has no entry for it.
    fn display_value(&self, raw: &CellValue) -> Option<String>;
}

/// Read-only view of the grid's rows used by the filter engine.
///
/// Implemented by the surrounding grid/collection layer. The engine only ever queries it; rows
/// are addressed by physical index in `0..row_count()` and columns in `0..column_count()`.
pub trait RowSource {
    /// Identity of the grid these rows belong to.
    fn grid_id(&self) -> GridId;

    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Layout-level visibility, independent of filtering. Header and group rows report `false`.
    fn is_row_visible(&self, row: usize) -> bool;

    fn raw_value(&self, row: usize, col: usize) -> CellValue;

    /// Locale-formatted text shown for the cell.
    fn display_text(&self, row: usize, col: usize) -> String;

    fn merged_range(&self, _row: usize, _col: usize) -> Option<CellRange> {
        None
    }

    fn data_map(&self, _col: usize) -> Option<&dyn DataMap> {
        None
    }

    fn data_type(&self, _col: usize) -> Option<DataType> {
        None
    }

    fn is_column_filterable(&self, _col: usize) -> bool {
        true
    }

    /// Locale the source formats numbers with. Display text is parsed back through it; `None`
    /// defers to the host's configured locale.
    fn value_locale(&self) -> Option<ValueLocaleConfig> {
        None
    }
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn grid_id(&self) -> GridId {
        (**self).grid_id()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn is_row_visible(&self, row: usize) -> bool {
        (**self).is_row_visible(row)
    }

    fn raw_value(&self, row: usize, col: usize) -> CellValue {
        (**self).raw_value(row, col)
    }

    fn display_text(&self, row: usize, col: usize) -> String {
        (**self).display_text(row, col)
    }

    fn merged_range(&self, row: usize, col: usize) -> Option<CellRange> {
        (**self).merged_range(row, col)
    }

    fn data_map(&self, col: usize) -> Option<&dyn DataMap> {
        (**self).data_map(col)
    }

    fn data_type(&self, col: usize) -> Option<DataType> {
        (**self).data_type(col)
    }

    fn is_column_filterable(&self, col: usize) -> bool {
        (**self).is_column_filterable(col)
    }

    fn value_locale(&self) -> Option<ValueLocaleConfig> {
        (**self).value_locale()
    }
}

/// A [`DataMap`] backed by a list of `(raw, display)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDataMap {
    entries: Vec<(CellValue, String)>,
}

impl MapDataMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, raw: impl Into<CellValue>, display: impl Into<String>) -> Self {
        self.insert(raw, display);
        self
    }

    pub fn insert(&mut self, raw: impl Into<CellValue>, display: impl Into<String>) {
        let raw = raw.into();
        let display = display.into();
        match self.entries.iter_mut().find(|(k, _)| *k == raw) {
            Some(entry) => entry.1 = display,
            None => self.entries.push((raw, display)),
        }
    }
}

impl DataMap for MapDataMap {
    fn display_value(&self, raw: &CellValue) -> Option<String> {
        self.entries
            .iter()
            .find(|(k, _)| k == raw)
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_range_representative_is_top_left() {
        let range = CellRange::new(2, 1, 4, 1);
        assert!(range.contains(3, 1));
        assert!(!range.contains(5, 1));
        assert!(range.is_representative(2, 1));
        assert!(!range.is_representative(3, 1));
    }

    #[test]
    fn map_data_map_replaces_existing_entries() {
        let mut map = MapDataMap::new().with_entry(1.0, "One");
        map.insert(1.0, "Uno");
        assert_eq!(map.display_value(&CellValue::Number(1.0)), Some("Uno".into()));
        assert_eq!(map.display_value(&CellValue::Number(2.0)), None);
    }
}
