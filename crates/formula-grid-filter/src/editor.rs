use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::host::FilterHost;
use crate::settings::SearchMode;
use crate::source::RowSource;
use crate::value::{casefold, sort_order, CellValue};
use crate::value_filter::ValueFilter;

/// One distinct display value offered by a value editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCandidate {
    /// First raw value seen with this display text.
    pub value: CellValue,
    pub text: String,
    pub checked: bool,
}

/// Result of [`ValueEditorModel::rebuild`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueList {
    pub candidates: Vec<ValueCandidate>,
    /// Candidates matching the search text, before the cap was applied.
    pub total: usize,
    /// More values matched than the editor may show.
    pub truncated: bool,
}

/// Editing session for one column's value filter.
///
/// Works on a draft copy of the column's [`ValueFilter`]; nothing changes in the host until
/// [`ValueEditorModel::commit`]. Candidate lists reflect every *other* column's filter so the
/// user only sees values that can still appear.
#[derive(Debug)]
pub struct ValueEditorModel<'a, S> {
    host: &'a mut FilterHost<S>,
    column: usize,
    draft: ValueFilter,
}

impl<'a, S: RowSource> ValueEditorModel<'a, S> {
    pub(crate) fn new(host: &'a mut FilterHost<S>, column: usize) -> Self {
        let draft = match host.column_filter(column).and_then(|f| f.value_filter()) {
            Some(existing) => existing.clone(),
            None => {
                let mut filter = ValueFilter::new(host.column_ref(column));
                filter.max_distinct_values = host.settings().max_distinct_values;
                filter.sort_values = host.settings().sort_values;
                filter
            }
        };
        Self {
            host,
            column,
            draft,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn draft(&self) -> &ValueFilter {
        &self.draft
    }

    pub fn filter_text(&self) -> &str {
        &self.draft.filter_text
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.draft.filter_text = text.into();
    }

    pub fn set_max_distinct_values(&mut self, max: usize) {
        self.draft.max_distinct_values = max;
    }

    /// Distinct values reachable under the other columns' filters, deduplicated by display
    /// text, before search and cap.
    fn candidates(&self) -> Vec<ValueCandidate> {
        let source = self.host.source();
        let col = self.column;
        let has_selection = self.draft.is_active();
        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<ValueCandidate> = Vec::new();

        for row in 0..source.row_count() {
            if !source.is_row_visible(row) {
                continue;
            }
            if source
                .merged_range(row, col)
                .is_some_and(|range| !range.is_representative(row, col))
            {
                continue;
            }

            let text = source.display_text(row, col);
            if seen.contains(&text) {
                continue;
            }
            // Keep a selected value listed even when other filters now exclude its rows.
            let selected = has_selection && self.draft.apply(source, row);
            if !selected && !self.host.row_passes_except(row, col) {
                continue;
            }

            let checked = !has_selection || self.draft.show_values.contains(&text);
            seen.insert(text.clone());
            out.push(ValueCandidate {
                value: source.raw_value(row, col),
                text,
                checked,
            });
        }

        if self.draft.sort_values {
            out.sort_by(|a, b| sort_order(&a.value, &b.value));
        }
        out
    }

    /// Recompute the candidate list. Calling this again without intervening changes yields the
    /// same list.
    pub fn rebuild(&self) -> ValueList {
        let mut candidates = self.candidates();

        let needle = self.draft.filter_text.trim();
        if !needle.is_empty() {
            let needle = casefold(needle);
            let mode = self.host.settings().search_mode;
            candidates.retain(|c| {
                let hay = casefold(&c.text);
                match mode {
                    SearchMode::Contains => hay.contains(&needle),
                    SearchMode::BeginsWith => hay.starts_with(&needle),
                }
            });
        }

        let total = candidates.len();
        let truncated = total > self.draft.max_distinct_values;
        if truncated {
            log::debug!(
                "value list for column {} truncated from {total} to {} entries",
                self.column,
                self.draft.max_distinct_values
            );
            candidates.truncate(self.draft.max_distinct_values);
        }
        log::trace!(
            "rebuilt value list for column {}: {} shown of {total}",
            self.column,
            candidates.len()
        );

        ValueList {
            candidates,
            total,
            truncated,
        }
    }

    /// Write the selection back into the column's value filter, replacing any condition filter.
    ///
    /// Selecting every reachable value (or none) leaves the filter unfiltered.
    pub fn commit<I, T>(mut self, selected: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let selected: BTreeSet<String> = selected.into_iter().map(Into::into).collect();
        let all = self.candidates();
        let selects_all = !all.is_empty() && all.iter().all(|c| selected.contains(&c.text));

        self.draft.show_values = if selects_all {
            BTreeSet::new()
        } else {
            selected
        };
        log::debug!(
            "committing value filter on column {} with {} shown values",
            self.column,
            self.draft.show_values.len()
        );

        let column = self.column;
        let max = self.draft.max_distinct_values;
        let draft = self.draft;
        let slot = self.host.slot_mut(column);
        *slot.edit_value(max) = draft;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CellRange, GridId};
    use crate::table::{TableColumn, TableSource};
    use pretty_assertions::assert_eq;

    fn texts(list: &ValueList) -> Vec<&str> {
        list.candidates.iter().map(|c| c.text.as_str()).collect()
    }

    fn host() -> FilterHost<TableSource> {
        let source = TableSource::new(
            GridId(11),
            vec![TableColumn::new("city"), TableColumn::new("country")],
            vec![
                vec!["Paris".into(), "FR".into()],
                vec!["Lyon".into(), "FR".into()],
                vec!["Berlin".into(), "DE".into()],
                vec!["Paris".into(), "FR".into()],
                vec!["Munich".into(), "DE".into()],
                vec![CellValue::Blank, "DE".into()],
            ],
        )
        .unwrap();
        FilterHost::new(source)
    }

    #[test]
    fn lists_distinct_values_all_checked_when_unfiltered() {
        let mut h = host();
        let editor = h.value_editor(0).unwrap();
        let list = editor.rebuild();
        assert_eq!(texts(&list), vec!["Berlin", "Lyon", "Munich", "Paris", ""]);
        assert!(list.candidates.iter().all(|c| c.checked));
        assert!(!list.truncated);
    }

    #[test]
    fn narrows_by_other_column_filters() {
        let mut h = host();
        h.edit_value(1).unwrap().show_values.insert("FR".into());
        let list = h.value_editor(0).unwrap().rebuild();
        assert_eq!(texts(&list), vec!["Lyon", "Paris"]);
    }

    #[test]
    fn keeps_selected_values_excluded_by_other_filters() {
        let mut h = host();
        h.edit_value(0).unwrap().show_values.insert("Berlin".into());
        h.edit_value(1).unwrap().show_values.insert("FR".into());
        let list = h.value_editor(0).unwrap().rebuild();
        assert_eq!(texts(&list), vec!["Berlin", "Lyon", "Paris"]);
        let checked: Vec<bool> = list.candidates.iter().map(|c| c.checked).collect();
        assert_eq!(checked, vec![true, false, false]);
    }

    #[test]
    fn search_text_and_cap_apply_after_dedup() {
        let mut h = host();
        let mut editor = h.value_editor(0).unwrap();
        editor.set_filter_text("I");
        let list = editor.rebuild();
        assert_eq!(texts(&list), vec!["Berlin", "Munich", "Paris"]);

        editor.set_max_distinct_values(2);
        let list = editor.rebuild();
        assert_eq!(texts(&list), vec!["Berlin", "Munich"]);
        assert_eq!(list.total, 3);
        assert!(list.truncated);
    }

    #[test]
    fn begins_with_search_mode() {
        let mut h = host();
        h.settings_mut().search_mode = SearchMode::BeginsWith;
        let mut editor = h.value_editor(0).unwrap();
        editor.set_filter_text("p");
        assert_eq!(texts(&editor.rebuild()), vec!["Paris"]);
    }

    #[test]
    fn unsorted_lists_keep_first_appearance_order() {
        let mut h = host();
        h.settings_mut().sort_values = false;
        let list = h.value_editor(1).unwrap().rebuild();
        assert_eq!(texts(&list), vec!["FR", "DE"]);
    }

    #[test]
    fn skips_layout_hidden_rows_and_merged_followers() {
        let mut h = host();
        h.source_mut().set_row_hidden(1, true);
        h.source_mut().merge(CellRange::new(2, 0, 3, 0)).unwrap();
        let list = h.value_editor(0).unwrap().rebuild();
        // Row 3 ("Paris") sits inside the merge headed by row 2; row 0 still lists Paris.
        assert_eq!(texts(&list), vec!["Berlin", "Munich", "Paris", ""]);
    }

    #[test]
    fn commit_writes_show_values_and_switches_kind() {
        let mut h = host();
        h.edit_condition(0).unwrap();
        h.value_editor(0).unwrap().commit(["Paris"]);
        let filter = h.column_filter(0).and_then(|f| f.value_filter()).unwrap();
        assert_eq!(filter.show_values, BTreeSet::from(["Paris".to_string()]));
        assert_eq!(h.visible_rows(), vec![0, 3]);
    }

    #[test]
    fn committing_every_value_clears_the_selection() {
        let mut h = host();
        h.edit_value(1).unwrap().show_values.insert("DE".into());
        h.value_editor(0)
            .unwrap()
            .commit(["Berlin", "Munich", ""]);
        let filter = h.column_filter(0).and_then(|f| f.value_filter()).unwrap();
        assert!(filter.show_values.is_empty());
        assert_eq!(h.visible_rows(), vec![2, 4, 5]);
    }
}
