//! Repository layer over the key-value capability.
//!
//! # Responsibility
//! - Define the entry collection persistence contract.
//! - Provide the sample collection used to seed empty storage.
//!
//! # Invariants
//! - Repository writes validate every entry before persistence.

pub mod entry_repo;
pub mod seed;
