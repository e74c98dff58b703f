use serde::{Deserialize, Serialize};

use crate::column_filter::FilterKind;
use crate::condition::CompareOptions;
use crate::locale::ValueLocaleConfig;
use crate::value_filter::DEFAULT_MAX_DISTINCT_VALUES;

/// How the value editor's free-text search matches candidate texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Contains,
    BeginsWith,
}

/// Filter kinds a column accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Condition,
    Value,
    #[default]
    Both,
}

impl FilterType {
    #[must_use]
    pub fn allows(self, kind: FilterKind) -> bool {
        match (self, kind) {
            (_, FilterKind::None) | (FilterType::Both, _) => true,
            (FilterType::Condition, FilterKind::Condition) => true,
            (FilterType::Value, FilterKind::Value) => true,
            _ => false,
        }
    }
}

/// Host-wide filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Compare condition strings case-sensitively.
    pub case_sensitive: bool,
    pub search_mode: SearchMode,
    /// Cap copied into newly created value filters.
    pub max_distinct_values: usize,
    /// Whether new value filters sort their candidates by raw value.
    pub sort_values: bool,
    /// Filter kinds columns accept unless overridden per column.
    pub default_filter_type: FilterType,
    /// Locale used to parse display text back into numbers when the row source does not
    /// report the locale it formats with.
    pub value_locale: ValueLocaleConfig,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            search_mode: SearchMode::Contains,
            max_distinct_values: DEFAULT_MAX_DISTINCT_VALUES,
            sort_values: true,
            default_filter_type: FilterType::Both,
            value_locale: ValueLocaleConfig::en_us(),
        }
    }
}

impl FilterSettings {
    #[must_use]
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            case_sensitive: self.case_sensitive,
            value_locale: self.value_locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let settings: FilterSettings =
            serde_json::from_str(r#"{"case_sensitive": true, "search_mode": "begins_with"}"#)
                .unwrap();
        assert_eq!(
            settings,
            FilterSettings {
                case_sensitive: true,
                search_mode: SearchMode::BeginsWith,
                ..FilterSettings::default()
            }
        );
    }

    #[test]
    fn filter_type_allows_matching_kinds() {
        assert!(FilterType::Both.allows(FilterKind::Value));
        assert!(FilterType::Condition.allows(FilterKind::Condition));
        assert!(!FilterType::Condition.allows(FilterKind::Value));
        assert!(FilterType::Value.allows(FilterKind::None));
    }
}
