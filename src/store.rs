//! Detection store: the single source of truth for the loaded result set.
//!
//! Each detection is wrapped in an [`Entry`] carrying its `index`, the
//! ordinal position in the original unfiltered response. That index is the
//! sole correlation key between an overlay box and a list row, so it is
//! assigned exactly once at load and never reassigned, filtering included.

use crate::filter;
use crate::Detection;

/// A detection plus its stable ordinal index.
#[derive(Clone, Debug)]
pub struct Entry {
    pub index: usize,
    pub detection: Detection,
}

/// Holds the current full result set, the filter query, and the active
/// selection.
#[derive(Debug, Default)]
pub struct DetectionStore {
    entries: Vec<Entry>,
    filter_query: String,
    active_index: Option<usize>,
}

impl DetectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set wholesale. Indices are assigned from load
    /// order; filter query and active selection reset.
    pub fn load(&mut self, detections: Vec<Detection>) {
        self.entries = detections
            .into_iter()
            .enumerate()
            .map(|(index, detection)| Entry { index, detection })
            .collect();
        self.filter_query.clear();
        self.active_index = None;
    }

    /// Empty all state (reset / new upload).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.filter_query.clear();
        self.active_index = None;
    }

    pub fn set_filter_query(&mut self, query: &str) {
        self.filter_query = query.to_string();
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn set_active_index(&mut self, index: Option<usize>) {
        self.active_index = index;
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    /// The entries passing the current filter query, in original relative
    /// order with original indices. Filtering never renumbers.
    pub fn current_view(&self) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| filter::matches(&entry.detection, &self.filter_query))
            .collect()
    }

    /// Whether the given index survives the current filter.
    pub fn view_contains(&self, index: usize) -> bool {
        self.current_view().iter().any(|entry| entry.index == index)
    }
}
