//! Serializable snapshot of a host's column filters.
//!
//! Grids persist this alongside their layout so filters survive a reload. Only slots that hold
//! a filter are recorded; `None` slots are implied by absence.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::column_filter::{ActiveFilter, ColumnFilter, FilterKind};
use crate::condition::Condition;
use crate::condition_filter::ConditionFilter;
use crate::error::FilterError;
use crate::host::FilterHost;
use crate::source::RowSource;
use crate::value_filter::ValueFilter;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnFilterDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnFilterDefinition {
    Condition {
        column: usize,
        #[serde(default)]
        condition1: Condition,
        #[serde(default)]
        condition2: Condition,
        #[serde(default = "default_true")]
        combine_with_and: bool,
    },
    Value {
        column: usize,
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        show_values: BTreeSet<String>,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        filter_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_distinct_values: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sort_values: Option<bool>,
    },
}

fn default_true() -> bool {
    true
}

impl ColumnFilterDefinition {
    pub fn column(&self) -> usize {
        match self {
            ColumnFilterDefinition::Condition { column, .. }
            | ColumnFilterDefinition::Value { column, .. } => *column,
        }
    }

    fn kind(&self) -> FilterKind {
        match self {
            ColumnFilterDefinition::Condition { .. } => FilterKind::Condition,
            ColumnFilterDefinition::Value { .. } => FilterKind::Value,
        }
    }

    fn from_slot(column: usize, slot: &ColumnFilter) -> Option<Self> {
        match slot.active() {
            ActiveFilter::None => None,
            ActiveFilter::Condition(f) => Some(ColumnFilterDefinition::Condition {
                column,
                condition1: f.condition1.clone(),
                condition2: f.condition2.clone(),
                combine_with_and: f.combine_with_and,
            }),
            ActiveFilter::Value(f) => Some(ColumnFilterDefinition::Value {
                column,
                show_values: f.show_values.clone(),
                filter_text: f.filter_text.clone(),
                max_distinct_values: Some(f.max_distinct_values),
                sort_values: Some(f.sort_values),
            }),
        }
    }
}

impl<S: RowSource> FilterHost<S> {
    /// Snapshot the current column filters, ordered by column.
    pub fn definition(&self) -> FilterDefinition {
        let mut columns: Vec<ColumnFilterDefinition> = self
            .filters()
            .filter_map(|(column, slot)| ColumnFilterDefinition::from_slot(column, slot))
            .collect();
        columns.sort_by_key(ColumnFilterDefinition::column);
        FilterDefinition { columns }
    }

    pub fn definition_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string(&self.definition())?)
    }

    /// Replace every column filter with `definition`.
    ///
    /// The definition is validated as a whole first; on error the current filters are kept.
    pub fn set_definition(&mut self, definition: &FilterDefinition) -> Result<(), FilterError> {
        for entry in &definition.columns {
            self.check_column(entry.column(), entry.kind())?;
        }

        let settings = self.settings().clone();
        let mut filters: HashMap<usize, ColumnFilter> = HashMap::new();
        for entry in &definition.columns {
            let column_ref = self.column_ref(entry.column());
            let mut slot = ColumnFilter::new(column_ref);
            match entry {
                ColumnFilterDefinition::Condition {
                    condition1,
                    condition2,
                    combine_with_and,
                    ..
                } => {
                    slot.set_condition(ConditionFilter {
                        column: column_ref,
                        condition1: condition1.clone(),
                        condition2: condition2.clone(),
                        combine_with_and: *combine_with_and,
                    });
                }
                ColumnFilterDefinition::Value {
                    show_values,
                    filter_text,
                    max_distinct_values,
                    sort_values,
                    ..
                } => {
                    let mut filter = ValueFilter::new(column_ref);
                    filter.show_values = show_values.clone();
                    filter.filter_text = filter_text.clone();
                    filter.max_distinct_values =
                        max_distinct_values.unwrap_or(settings.max_distinct_values);
                    filter.sort_values = sort_values.unwrap_or(settings.sort_values);
                    slot.set_value(filter);
                }
            }
            // Later entries for the same column win.
            filters.insert(entry.column(), slot);
        }

        log::debug!(
            "applied filter definition with {} column filters",
            filters.len()
        );
        self.replace_filters(filters);
        Ok(())
    }

    pub fn set_definition_json(&mut self, json: &str) -> Result<(), FilterError> {
        let definition: FilterDefinition = serde_json::from_str(json)?;
        self.set_definition(&definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Operator;
    use crate::source::GridId;
    use crate::table::{TableColumn, TableSource};
    use crate::value::CellValue;
    use pretty_assertions::assert_eq;

    fn host() -> FilterHost<TableSource> {
        let source = TableSource::new(
            GridId(2),
            vec![
                TableColumn::new("name"),
                TableColumn::new("qty"),
                TableColumn::new("id").not_filterable(),
            ],
            vec![
                vec!["a".into(), CellValue::Number(1.0), CellValue::Number(1.0)],
                vec!["b".into(), CellValue::Number(5.0), CellValue::Number(2.0)],
                vec!["c".into(), CellValue::Number(9.0), CellValue::Number(3.0)],
            ],
        )
        .unwrap();
        FilterHost::new(source)
    }

    #[test]
    fn definition_restores_an_equivalent_host() {
        let mut h = host();
        h.edit_value(0)
            .unwrap()
            .show_values
            .extend(["a".to_string(), "c".to_string()]);
        h.edit_condition(1).unwrap().condition1 = Condition::new(Operator::GreaterThan, 2.0);
        let json = h.definition_json().unwrap();

        let mut restored = host();
        restored.set_definition_json(&json).unwrap();
        assert_eq!(restored.definition(), h.definition());
        assert_eq!(restored.visible_rows(), vec![2]);
    }

    #[test]
    fn parses_minimal_json() {
        let mut h = host();
        h.set_definition_json(
            r#"{"columns":[{"type":"condition","column":1,
                "condition1":{"operator":"less_than","value":{"type":"number","value":6},"active":true}}]}"#,
        )
        .unwrap();
        assert_eq!(h.visible_rows(), vec![0, 1]);
        let slot = h.column_filter(1).and_then(|f| f.condition_filter()).unwrap();
        assert!(slot.combine_with_and);
        assert!(!slot.condition2.is_active());
    }

    #[test]
    fn invalid_definitions_leave_filters_untouched() {
        let mut h = host();
        h.edit_value(0).unwrap().show_values.insert("b".into());
        let before = h.definition();

        let bad = FilterDefinition {
            columns: vec![
                ColumnFilterDefinition::Value {
                    column: 0,
                    show_values: BTreeSet::new(),
                    filter_text: String::new(),
                    max_distinct_values: None,
                    sort_values: None,
                },
                ColumnFilterDefinition::Value {
                    column: 2,
                    show_values: BTreeSet::from(["1".to_string()]),
                    filter_text: String::new(),
                    max_distinct_values: None,
                    sort_values: None,
                },
            ],
        };
        assert!(matches!(
            h.set_definition(&bad),
            Err(FilterError::NotFilterable { column: 2 })
        ));
        assert_eq!(h.definition(), before);

        assert!(matches!(
            h.set_definition_json("{not json"),
            Err(FilterError::InvalidDefinition(_))
        ));
        assert_eq!(h.definition(), before);
    }

    #[test]
    fn empty_definition_clears_all_filters() {
        let mut h = host();
        h.edit_value(0).unwrap().show_values.insert("b".into());
        h.set_definition(&FilterDefinition::default()).unwrap();
        assert!(h.column_filter(0).is_none());
        assert_eq!(h.definition_json().unwrap(), "{}");
    }
}
