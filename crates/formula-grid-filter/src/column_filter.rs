use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::CompareOptions;
use crate::condition_filter::ConditionFilter;
use crate::source::{ColumnRef, RowSource};
use crate::value_filter::ValueFilter;

/// Which kind of filter occupies a column's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    None,
    Condition,
    Value,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::None => "none",
            FilterKind::Condition => "condition",
            FilterKind::Value => "value",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActiveFilter {
    None,
    Condition(ConditionFilter),
    Value(ValueFilter),
}

/// Per-column slot holding at most one filter kind.
///
/// Switching kinds discards the previous kind's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    column: ColumnRef,
    active: ActiveFilter,
}

impl ColumnFilter {
    #[must_use]
    pub fn new(column: ColumnRef) -> Self {
        Self {
            column,
            active: ActiveFilter::None,
        }
    }

    pub fn column(&self) -> ColumnRef {
        self.column
    }

    pub fn active(&self) -> &ActiveFilter {
        &self.active
    }

    pub fn kind(&self) -> FilterKind {
        match &self.active {
            ActiveFilter::None => FilterKind::None,
            ActiveFilter::Condition(_) => FilterKind::Condition,
            ActiveFilter::Value(_) => FilterKind::Value,
        }
    }

    /// `true` when the slot holds a filter that can hide rows.
    pub fn is_active(&self) -> bool {
        match &self.active {
            ActiveFilter::None => false,
            ActiveFilter::Condition(f) => f.is_active(),
            ActiveFilter::Value(f) => f.is_active(),
        }
    }

    pub fn condition_filter(&self) -> Option<&ConditionFilter> {
        match &self.active {
            ActiveFilter::Condition(f) => Some(f),
            _ => None,
        }
    }

    pub fn value_filter(&self) -> Option<&ValueFilter> {
        match &self.active {
            ActiveFilter::Value(f) => Some(f),
            _ => None,
        }
    }

    /// Switch to (or keep) the condition kind and return it for editing.
    pub fn edit_condition(&mut self) -> &mut ConditionFilter {
        if !matches!(self.active, ActiveFilter::Condition(_)) {
            self.active = ActiveFilter::Condition(ConditionFilter::new(self.column));
        }
        match &mut self.active {
            ActiveFilter::Condition(f) => f,
            _ => unreachable!("slot was just switched to a condition filter"),
        }
    }

    /// Switch to (or keep) the value kind and return it for editing.
    pub fn edit_value(&mut self, max_distinct_values: usize) -> &mut ValueFilter {
        if !matches!(self.active, ActiveFilter::Value(_)) {
            let mut filter = ValueFilter::new(self.column);
            filter.max_distinct_values = max_distinct_values;
            self.active = ActiveFilter::Value(filter);
        }
        match &mut self.active {
            ActiveFilter::Value(f) => f,
            _ => unreachable!("slot was just switched to a value filter"),
        }
    }

    pub fn set_condition(&mut self, filter: ConditionFilter) {
        self.active = ActiveFilter::Condition(filter);
    }

    pub fn set_value(&mut self, filter: ValueFilter) {
        self.active = ActiveFilter::Value(filter);
    }

    pub fn clear(&mut self) {
        self.active = ActiveFilter::None;
    }

    pub fn apply<S: RowSource + ?Sized>(
        &self,
        source: &S,
        row: usize,
        options: &CompareOptions,
    ) -> bool {
        match &self.active {
            ActiveFilter::None => true,
            ActiveFilter::Condition(f) => f.apply(source, row, options),
            ActiveFilter::Value(f) => f.apply(source, row),
        }
    }
}
