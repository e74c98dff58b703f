use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::locale::ValueLocaleConfig;
use crate::source::RowSource;
use crate::value::{compare_values, fold_if, CellValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    BeginsWith,
    EndsWith,
    Contains,
    DoesNotContain,
}

impl Operator {
    /// String-style operators always compare text, whatever the cell's type.
    #[must_use]
    pub fn is_text_operator(self) -> bool {
        matches!(
            self,
            Operator::BeginsWith
                | Operator::EndsWith
                | Operator::Contains
                | Operator::DoesNotContain
        )
    }
}

/// What a condition is evaluated against after the owning filter has normalized the cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparand {
    Value(CellValue),
    /// The cell is compared against null for this condition, which no operator matches.
    /// Produced for a numeric zero in an untyped column when the condition literal is the
    /// empty string, so that `= ""` selects blanks and never zeros.
    Absent,
}

impl From<CellValue> for Comparand {
    fn from(value: CellValue) -> Self {
        Comparand::Value(value)
    }
}

/// Comparison options shared by every condition of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareOptions {
    pub case_sensitive: bool,
    pub value_locale: ValueLocaleConfig,
}

impl CompareOptions {
    /// These options with the locale `source` formats with, when it reports one.
    #[must_use]
    pub fn for_source<S: RowSource + ?Sized>(&self, source: &S) -> Self {
        Self {
            value_locale: source.value_locale().unwrap_or(self.value_locale),
            ..*self
        }
    }
}

/// A single comparator (operator + operand) over one cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub operator: Operator,
    #[serde(default)]
    pub value: CellValue,
    /// A persisted condition without this flag is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Condition {
    #[must_use]
    pub fn new(operator: Operator, value: impl Into<CellValue>) -> Self {
        Self {
            operator,
            value: value.into(),
            active: true,
        }
    }

    /// An inactive condition; it passes every value.
    #[must_use]
    pub fn inactive() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `true` when the operand is the empty-string literal.
    #[must_use]
    pub fn has_empty_literal(&self) -> bool {
        self.value.as_text().is_some_and(str::is_empty)
    }

    pub fn apply(&self, comparand: &Comparand, options: &CompareOptions) -> bool {
        if !self.active {
            return true;
        }
        match comparand {
            Comparand::Absent => false,
            Comparand::Value(value) => self.apply_value(value, options),
        }
    }

    fn apply_value(&self, value: &CellValue, options: &CompareOptions) -> bool {
        if self.operator.is_text_operator() {
            return self.apply_text(value, options);
        }

        let operand = coerce_operand(&self.value, value, options.value_locale);
        let Some(ord) = compare_values(value, &operand, options.case_sensitive) else {
            return false;
        };
        match self.operator {
            Operator::Equals => ord == Ordering::Equal,
            Operator::NotEquals => ord != Ordering::Equal,
            Operator::GreaterThan => ord == Ordering::Greater,
            Operator::GreaterOrEqual => ord != Ordering::Less,
            Operator::LessThan => ord == Ordering::Less,
            Operator::LessOrEqual => ord != Ordering::Greater,
            Operator::BeginsWith
            | Operator::EndsWith
            | Operator::Contains
            | Operator::DoesNotContain => false,
        }
    }

    fn apply_text(&self, value: &CellValue, options: &CompareOptions) -> bool {
        let hay = fold_if(
            &comparable_text(value, options.value_locale),
            options.case_sensitive,
        );
        let needle = fold_if(
            &comparable_text(&self.value, options.value_locale),
            options.case_sensitive,
        );
        match self.operator {
            Operator::BeginsWith => hay.starts_with(&needle),
            Operator::EndsWith => hay.ends_with(&needle),
            Operator::Contains => hay.contains(&needle),
            Operator::DoesNotContain => !hay.contains(&needle),
            _ => false,
        }
    }
}

/// Text operators read blanks as `""` and format scalars with the value locale.
fn comparable_text(value: &CellValue, locale: ValueLocaleConfig) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        other => locale.format_value(other),
    }
}

/// A text operand typed by the user is read as the cell's type when it parses as one.
fn coerce_operand(operand: &CellValue, value: &CellValue, locale: ValueLocaleConfig) -> CellValue {
    let CellValue::Text(text) = operand else {
        return operand.clone();
    };
    let coerced = match value {
        CellValue::Number(_) => locale.parse_number(text).map(CellValue::Number),
        CellValue::DateTime(_) => locale.parse_datetime(text).map(CellValue::DateTime),
        CellValue::Bool(_) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(CellValue::Bool(true)),
            "false" => Some(CellValue::Bool(false)),
            _ => None,
        },
        CellValue::Blank | CellValue::Text(_) => None,
    };
    coerced.unwrap_or_else(|| operand.clone())
}
