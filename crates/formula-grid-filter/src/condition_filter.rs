use crate::condition::{Comparand, CompareOptions, Condition};
use crate::source::{ColumnRef, RowSource};
use crate::value::CellValue;

/// Two [`Condition`]s over one column, combined with AND or OR.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionFilter {
    pub column: ColumnRef,
    pub condition1: Condition,
    pub condition2: Condition,
    pub combine_with_and: bool,
}

impl ConditionFilter {
    #[must_use]
    pub fn new(column: ColumnRef) -> Self {
        Self {
            column,
            condition1: Condition::inactive(),
            condition2: Condition::inactive(),
            combine_with_and: true,
        }
    }

    #[must_use]
    pub fn with_conditions(mut self, condition1: Condition, condition2: Condition) -> Self {
        self.condition1 = condition1;
        self.condition2 = condition2;
        self
    }

    #[must_use]
    pub fn combined_with_or(mut self) -> Self {
        self.combine_with_and = false;
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.condition1.is_active() || self.condition2.is_active()
    }

    pub fn clear(&mut self) {
        self.condition1.clear();
        self.condition2.clear();
        self.combine_with_and = true;
    }

    /// Whether `row` passes this filter.
    ///
    /// Fails closed when `source` is not the grid this filter was created for.
    pub fn apply<S: RowSource + ?Sized>(
        &self,
        source: &S,
        row: usize,
        options: &CompareOptions,
    ) -> bool {
        if source.grid_id() != self.column.grid {
            log::debug!(
                "condition filter for column {} of grid {:?} evaluated against grid {:?}",
                self.column.index,
                self.column.grid,
                source.grid_id()
            );
            return false;
        }
        if !self.is_active() {
            return true;
        }

        let options = options.for_source(source);
        let (c1, c2) = self.normalize(source, row, &options);
        let r1 = self.condition1.apply(&c1, &options);
        let r2 = self.condition2.apply(&c2, &options);
        match (self.condition1.is_active(), self.condition2.is_active()) {
            (true, true) if self.combine_with_and => r1 && r2,
            (true, true) => r1 || r2,
            (true, false) => r1,
            (false, true) => r2,
            (false, false) => true,
        }
    }

    /// Resolve the cell at `row` into the comparands seen by `condition1` and `condition2`.
    ///
    /// Exactly one branch applies:
    /// - the column has a data map: both compare the mapped display value;
    /// - the cell is a date/time: a condition with a text operand compares the display text;
    /// - the cell is a number: both compare the display text parsed back through the locale
    ///   the source formats with (falling back to `options`), except that a zero in an
    ///   untyped column is [`Comparand::Absent`] for an active condition whose literal is `""`;
    /// - anything else is compared raw.
    pub fn normalize<S: RowSource + ?Sized>(
        &self,
        source: &S,
        row: usize,
        options: &CompareOptions,
    ) -> (Comparand, Comparand) {
        let col = self.column.index;
        let raw = source.raw_value(row, col);

        if let Some(map) = source.data_map(col) {
            let mapped = map.display_value(&raw).map_or(raw, CellValue::Text);
            return (Comparand::Value(mapped.clone()), Comparand::Value(mapped));
        }

        match raw {
            CellValue::DateTime(_) => {
                let mut text = None;
                let mut resolve = |cond: &Condition| {
                    if matches!(cond.value, CellValue::Text(_)) {
                        let shown = text.get_or_insert_with(|| source.display_text(row, col));
                        Comparand::Value(CellValue::Text(shown.clone()))
                    } else {
                        Comparand::Value(raw.clone())
                    }
                };
                let c1 = resolve(&self.condition1);
                let c2 = resolve(&self.condition2);
                (c1, c2)
            }
            CellValue::Number(n) => {
                let shown = options
                    .for_source(source)
                    .value_locale
                    .parse_number(&source.display_text(row, col))
                    .unwrap_or(n);
                let untyped_zero = shown == 0.0 && source.data_type(col).is_none();
                let resolve = |cond: &Condition| {
                    if untyped_zero && cond.is_active() && cond.has_empty_literal() {
                        Comparand::Absent
                    } else {
                        Comparand::Value(CellValue::Number(shown))
                    }
                };
                (resolve(&self.condition1), resolve(&self.condition2))
            }
            other => (Comparand::Value(other.clone()), Comparand::Value(other)),
        }
    }
}
