use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// Locale configuration used when turning display text back into values (and for the default
/// display formatting of [`crate::TableSource`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueLocaleConfig {
    pub decimal_sep: char,
    pub thousands_sep: char,
}

impl Default for ValueLocaleConfig {
    fn default() -> Self {
        Self::en_us()
    }
}

impl ValueLocaleConfig {
    #[must_use]
    pub const fn new(decimal_sep: char, thousands_sep: char) -> Self {
        Self {
            decimal_sep,
            thousands_sep,
        }
    }

    #[must_use]
    pub const fn en_us() -> Self {
        Self::new('.', ',')
    }

    #[must_use]
    pub const fn de_de() -> Self {
        Self::new(',', '.')
    }

    /// French uses a (narrow) no-break space for grouping.
    #[must_use]
    pub const fn fr_fr() -> Self {
        Self::new(',', '\u{202f}')
    }

    /// Parse locale-formatted display text into a number.
    ///
    /// Accepts an optional sign, accounting parentheses, a leading currency symbol and trailing
    /// percent signs. Empty or whitespace-only text is never numeric.
    #[must_use]
    pub fn parse_number(&self, text: &str) -> Option<f64> {
        let mut s = text.trim();
        if s.is_empty() {
            return None;
        }

        let mut negative = false;
        if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
            negative = true;
            s = s[1..s.len() - 1].trim();
        }
        if let Some(rest) = s.strip_prefix('-') {
            negative = !negative;
            s = rest.trim_start();
        } else if let Some(rest) = s.strip_prefix('+') {
            s = rest.trim_start();
        }
        s = s
            .trim_start_matches(|c: char| matches!(c, '$' | '€' | '£' | '¥'))
            .trim();

        let mut percent = 0;
        while let Some(rest) = s.trim_end().strip_suffix('%') {
            percent += 1;
            s = rest;
        }

        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() || *c == self.thousands_sep)
            .collect();
        if compact.is_empty() || !self.has_valid_grouping(&compact) {
            return None;
        }

        let mut normalized = String::with_capacity(compact.len());
        for c in compact.chars() {
            if c == self.thousands_sep {
                continue;
            }
            if c == self.decimal_sep {
                normalized.push('.');
            } else if c.is_ascii_digit() || matches!(c, 'e' | 'E' | '+' | '-') {
                normalized.push(c);
            } else {
                return None;
            }
        }
        // Reject a bare exponent such as "e5".
        if !normalized.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return None;
        }
        let mut n: f64 = normalized.parse().ok()?;
        for _ in 0..percent {
            n /= 100.0;
        }
        Some(if negative { -n } else { n })
    }

    fn has_valid_grouping(&self, compact: &str) -> bool {
        let (group, decimal) = (self.thousands_sep, self.decimal_sep);
        if group == decimal {
            return false;
        }
        let mantissa = compact
            .split_once(|c: char| c == 'e' || c == 'E')
            .map(|(m, _)| m)
            .unwrap_or(compact);
        if !mantissa.contains(group) {
            return true;
        }

        let (integer, fractional) = mantissa
            .split_once(decimal)
            .map(|(i, f)| (i, Some(f)))
            .unwrap_or((mantissa, None));
        if fractional.is_some_and(|f| f.contains(group)) {
            return false;
        }

        let segments: Vec<&str> = integer.split(group).collect();
        if segments[0].is_empty() || segments[0].len() > 3 {
            return false;
        }
        segments[1..]
            .iter()
            .all(|seg| seg.len() == 3 && seg.chars().all(|c| c.is_ascii_digit()))
    }

    /// Parse display text as a date/time using unambiguous ISO-style layouts.
    #[must_use]
    pub fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        let s = text.trim();
        if s.is_empty() {
            return None;
        }
        for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
                return Some(dt);
            }
        }
        for layout in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(s, layout) {
                return date.and_hms_opt(0, 0, 0);
            }
        }
        None
    }

    /// Default display formatting for a raw value.
    ///
    /// Grids normally format cells themselves; this is what [`crate::TableSource`] shows when a
    /// column has no data map.
    #[must_use]
    pub fn format_value(&self, value: &CellValue) -> String {
        match value {
            CellValue::Blank => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Number(n) => self.format_number(*n),
            CellValue::DateTime(dt) => {
                if dt.num_seconds_from_midnight() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }

    fn format_number(&self, n: f64) -> String {
        // Normalize negative zero.
        let n = if n == 0.0 { 0.0 } else { n };
        let text = n.to_string();
        if self.decimal_sep == '.' {
            text
        } else {
            text.replace('.', &self.decimal_sep.to_string())
        }
    }
}
