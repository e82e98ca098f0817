//! Filter/search/sort pipeline over the in-memory entry collection.
//!
//! # Invariants
//! - Predicates combine with logical AND; empty predicates are inactive.
//! - `visible` is ordered by `date DESC`, ties keep collection order.
//! - The vocabulary always reflects the full collection, never the view.

use crate::model::entry::{Entry, EntryStatus};
use std::collections::BTreeSet;

/// Query options for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    /// Free-text term matched case-insensitively against title, body, tags.
    pub search: String,
    /// Exact, case-sensitive tag membership filter.
    pub tag: Option<String>,
    /// Exact status filter.
    pub status: Option<EntryStatus>,
}

impl EntryQuery {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns whether no predicate is active.
    pub fn is_inactive(&self) -> bool {
        normalized_needle(&self.search).is_none() && self.tag.is_none() && self.status.is_none()
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryView<'a> {
    /// Matching entries, most recent first.
    pub visible: Vec<&'a Entry>,
    /// Distinct tags across the whole collection, sorted ascending.
    pub vocabulary: Vec<String>,
}

/// Entry counts per status over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryStats {
    pub total: usize,
    pub planned: usize,
    pub in_progress: usize,
    pub complete: usize,
}

/// Runs the filter/sort pipeline and derives the tag vocabulary.
pub fn run_query<'a>(entries: &'a [Entry], query: &EntryQuery) -> QueryView<'a> {
    let needle = normalized_needle(&query.search);
    let mut visible = entries
        .iter()
        .filter(|entry| matches_search(entry, needle.as_deref()))
        .filter(|entry| matches_tag(entry, query.tag.as_deref()))
        .filter(|entry| query.status.map_or(true, |status| entry.status == status))
        .collect::<Vec<_>>();
    // `sort_by` is stable, which keeps same-date entries in collection order.
    visible.sort_by(|left, right| right.date.cmp(&left.date));

    QueryView {
        visible,
        vocabulary: tag_vocabulary(entries),
    }
}

/// Returns whether one entry passes every active predicate.
pub fn matches_query(entry: &Entry, query: &EntryQuery) -> bool {
    let needle = normalized_needle(&query.search);
    matches_search(entry, needle.as_deref())
        && matches_tag(entry, query.tag.as_deref())
        && query.status.map_or(true, |status| entry.status == status)
}

/// Collects distinct tags (case-sensitive) across all entries, sorted.
pub fn tag_vocabulary(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.tags.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Counts entries per status.
pub fn entry_stats(entries: &[Entry]) -> EntryStats {
    entries
        .iter()
        .fold(EntryStats::default(), |mut stats, entry| {
            stats.total += 1;
            match entry.status {
                EntryStatus::Planned => stats.planned += 1,
                EntryStatus::InProgress => stats.in_progress += 1,
                EntryStatus::Complete => stats.complete += 1,
            }
            stats
        })
}

fn normalized_needle(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn matches_search(entry: &Entry, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };

    entry.title.to_lowercase().contains(needle)
        || entry.body.to_lowercase().contains(needle)
        || entry
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

fn matches_tag(entry: &Entry, tag: Option<&str>) -> bool {
    tag.map_or(true, |wanted| entry.tags.iter().any(|candidate| candidate == wanted))
}

#[cfg(test)]
mod tests {
    use super::{normalized_needle, EntryQuery};
    use crate::model::entry::EntryStatus;

    #[test]
    fn whitespace_search_is_inactive() {
        assert_eq!(normalized_needle("   "), None);
        assert_eq!(normalized_needle(" DESeq2 "), Some("deseq2".to_string()));
        assert!(EntryQuery::new("  ").is_inactive());
        assert!(!EntryQuery::default()
            .with_status(EntryStatus::Complete)
            .is_inactive());
    }
}
