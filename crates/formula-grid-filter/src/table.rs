use std::collections::BTreeSet;

use thiserror::Error;

use crate::locale::ValueLocaleConfig;
use crate::source::{CellRange, DataMap, GridId, MapDataMap, RowSource};
use crate::value::{CellValue, DataType};

/// Column metadata for a [`TableSource`].
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub name: String,
    pub data_type: Option<DataType>,
    pub data_map: Option<MapDataMap>,
    pub filterable: bool,
}

impl TableColumn {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            data_map: None,
            filterable: true,
        }
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn with_data_map(mut self, data_map: MapDataMap) -> Self {
        self.data_map = Some(data_map);
        self
    }

    #[must_use]
    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has {column_count} columns but row {row_index} has {row_width} cells")]
    RowWidthMismatch {
        column_count: usize,
        row_index: usize,
        row_width: usize,
    },
    #[error("cell ({row}, {col}) is outside the table")]
    CellOutOfBounds { row: usize, col: usize },
    #[error("merged range {0:?} is outside the table or overlaps another merge")]
    InvalidMerge(CellRange),
}

/// In-memory, row-major [`RowSource`].
///
/// Supports live edits between scans; each scan reads whatever the table holds at that moment.
#[derive(Debug, Clone)]
pub struct TableSource {
    grid: GridId,
    columns: Vec<TableColumn>,
    rows: Vec<Vec<CellValue>>,
    merges: Vec<CellRange>,
    hidden_rows: BTreeSet<usize>,
    locale: ValueLocaleConfig,
}

impl TableSource {
    pub fn new(
        grid: GridId,
        columns: Vec<TableColumn>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, TableError> {
        let column_count = columns.len();
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != column_count {
                return Err(TableError::RowWidthMismatch {
                    column_count,
                    row_index,
                    row_width: row.len(),
                });
            }
        }
        Ok(Self {
            grid,
            columns,
            rows,
            merges: Vec::new(),
            hidden_rows: BTreeSet::new(),
            locale: ValueLocaleConfig::default(),
        })
    }

    #[must_use]
    pub fn with_locale(mut self, locale: ValueLocaleConfig) -> Self {
        self.locale = locale;
        self
    }

    pub fn set_value(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<CellValue>,
    ) -> Result<(), TableError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(TableError::CellOutOfBounds { row, col })?;
        *cell = value.into();
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidthMismatch {
                column_count: self.columns.len(),
                row_index: self.rows.len(),
                row_width: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn merge(&mut self, range: CellRange) -> Result<(), TableError> {
        let in_bounds = range.top_row <= range.bottom_row
            && range.left_col <= range.right_col
            && range.bottom_row < self.rows.len()
            && range.right_col < self.columns.len();
        let overlaps = self.merges.iter().any(|m| {
            m.top_row <= range.bottom_row
                && range.top_row <= m.bottom_row
                && m.left_col <= range.right_col
                && range.left_col <= m.right_col
        });
        if !in_bounds || overlaps {
            return Err(TableError::InvalidMerge(range));
        }
        self.merges.push(range);
        Ok(())
    }

    /// Hide or show a row at the layout level (e.g. collapsed group rows).
    pub fn set_row_hidden(&mut self, row: usize, hidden: bool) {
        if hidden {
            self.hidden_rows.insert(row);
        } else {
            self.hidden_rows.remove(&row);
        }
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        const BLANK: &CellValue = &CellValue::Blank;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(BLANK)
    }
}

impl RowSource for TableSource {
    fn grid_id(&self) -> GridId {
        self.grid
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn is_row_visible(&self, row: usize) -> bool {
        row < self.rows.len() && !self.hidden_rows.contains(&row)
    }

    fn raw_value(&self, row: usize, col: usize) -> CellValue {
        self.cell(row, col).clone()
    }

    fn display_text(&self, row: usize, col: usize) -> String {
        let value = self.cell(row, col);
        self.data_map(col)
            .and_then(|map| map.display_value(value))
            .unwrap_or_else(|| self.locale.format_value(value))
    }

    fn merged_range(&self, row: usize, col: usize) -> Option<CellRange> {
        self.merges.iter().copied().find(|m| m.contains(row, col))
    }

    fn data_map(&self, col: usize) -> Option<&dyn DataMap> {
        self.columns
            .get(col)
            .and_then(|c| c.data_map.as_ref())
            .map(|m| m as &dyn DataMap)
    }

    fn data_type(&self, col: usize) -> Option<DataType> {
        self.columns.get(col).and_then(|c| c.data_type)
    }

    fn is_column_filterable(&self, col: usize) -> bool {
        self.columns.get(col).is_some_and(|c| c.filterable)
    }

    fn value_locale(&self) -> Option<ValueLocaleConfig> {
        Some(self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> TableSource {
        TableSource::new(
            GridId(1),
            vec![
                TableColumn::new("id").with_data_map(MapDataMap::new().with_entry(1.0, "One")),
                TableColumn::new("amount"),
            ],
            vec![
                vec![CellValue::Number(1.0), CellValue::Number(1.5)],
                vec![CellValue::Number(2.0), CellValue::Blank],
            ],
        )
        .unwrap()
        .with_locale(ValueLocaleConfig::de_de())
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = TableSource::new(
            GridId(1),
            vec![TableColumn::new("a")],
            vec![vec![], vec![CellValue::Blank]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidthMismatch {
                column_count: 1,
                row_index: 0,
                row_width: 0
            }
        );
    }

    #[test]
    fn display_text_uses_data_map_then_locale() {
        let t = table();
        assert_eq!(t.display_text(0, 0), "One");
        assert_eq!(t.display_text(1, 0), "2");
        assert_eq!(t.display_text(0, 1), "1,5");
        assert_eq!(t.display_text(1, 1), "");
    }

    #[test]
    fn merges_must_not_overlap() {
        let mut t = table();
        t.merge(CellRange::new(0, 0, 1, 0)).unwrap();
        assert!(t.merge(CellRange::new(1, 0, 1, 1)).is_err());
        assert!(t.merge(CellRange::new(0, 1, 5, 1)).is_err());
        assert_eq!(t.merged_range(1, 0), Some(CellRange::new(0, 0, 1, 0)));
        assert_eq!(t.merged_range(1, 1), None);
    }

    #[test]
    fn hidden_rows_are_not_layout_visible() {
        let mut t = table();
        t.set_row_hidden(1, true);
        assert!(t.is_row_visible(0));
        assert!(!t.is_row_visible(1));
        t.set_row_hidden(1, false);
        assert!(t.is_row_visible(1));
    }

    #[test]
    fn live_edits_are_visible_to_the_next_read() {
        let mut t = table();
        t.set_value(1, 1, 3.0).unwrap();
        assert_eq!(t.raw_value(1, 1), CellValue::Number(3.0));
        assert_eq!(
            t.set_value(9, 0, 1.0),
            Err(TableError::CellOutOfBounds { row: 9, col: 0 })
        );
    }
}
