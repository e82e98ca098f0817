//! Entry query pipeline.
//!
//! # Responsibility
//! - Derive the visible, date-sorted entry list for a search/tag/status query.
//! - Derive the global tag vocabulary and per-status counts.
//!
//! # Invariants
//! - Pipeline functions are pure and never mutate the collection.

pub mod pipeline;

pub use pipeline::{
    entry_stats, matches_query, run_query, tag_vocabulary, EntryQuery, EntryStats, QueryView,
};
