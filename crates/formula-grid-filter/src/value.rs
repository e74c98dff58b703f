use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization as _;

/// A raw cell scalar as supplied by a [`crate::RowSource`].
///
/// This is the *underlying* value of a cell; what the user sees is the display text, which the
/// row source formats externally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Blank,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Rank used to order values of different kinds in the value editor: numbers, text,
    /// booleans, dates, then blanks last.
    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Number(_) => 0,
            CellValue::Text(_) => 1,
            CellValue::Bool(_) => 2,
            CellValue::DateTime(_) => 3,
            CellValue::Blank => 4,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Blank, Into::into)
    }
}

/// Declared data type of a grid column.
///
/// Columns without a declared type are "untyped": their cells may hold any [`CellValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
}

/// Unicode case folding used for case-insensitive comparisons.
///
/// Both sides are NFKC-normalized and uppercased so e.g. `straße` equals `STRASSE`.
pub(crate) fn casefold(s: &str) -> String {
    if s.is_ascii() {
        return s.to_ascii_uppercase();
    }
    s.nfkc().flat_map(char::to_uppercase).collect()
}

pub(crate) fn fold_if(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        casefold(s)
    }
}

/// Compare two scalars of the same kind.
///
/// Returns `None` for pairs that are not comparable (different kinds, or NaN). Blank is only
/// comparable to blank and to empty text.
pub(crate) fn compare_values(
    a: &CellValue,
    b: &CellValue,
    case_sensitive: bool,
) -> Option<Ordering> {
    match (a, b) {
        (CellValue::Blank, CellValue::Blank) => Some(Ordering::Equal),
        (CellValue::Blank, CellValue::Text(s)) | (CellValue::Text(s), CellValue::Blank) => {
            s.is_empty().then_some(Ordering::Equal)
        }
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => {
            if case_sensitive {
                Some(x.cmp(y))
            } else {
                Some(casefold(x).cmp(&casefold(y)))
            }
        }
        (CellValue::Bool(x), CellValue::Bool(y)) => Some(x.cmp(y)),
        (CellValue::DateTime(x), CellValue::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order over scalars used to sort value-editor candidates.
pub(crate) fn sort_order(a: &CellValue, b: &CellValue) -> Ordering {
    a.kind_rank()
        .cmp(&b.kind_rank())
        .then_with(|| match (a, b) {
            (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
            (CellValue::Text(x), CellValue::Text(y)) => {
                casefold(x).cmp(&casefold(y)).then_with(|| x.cmp(y))
            }
            _ => compare_values(a, b, true).unwrap_or(Ordering::Equal),
        })
}
