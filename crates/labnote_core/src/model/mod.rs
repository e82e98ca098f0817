//! Domain model for logged experiments.
//!
//! # Responsibility
//! - Define the entry record shared by query, rendering and storage.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Deletion removes an entry wholesale; there is no partial update.

pub mod entry;
