//! Markdown-like body rendering.
//!
//! # Responsibility
//! - Turn entry bodies into display markup via a small, ordered rule set.
//! - Derive plain-text card previews for list views.
//!
//! # Invariants
//! - Rendering is a pure, total function: equal input gives equal output
//!   and no input produces an error.
//! - Only the documented subset is recognized; everything else passes
//!   through as literal text.

pub mod preview;
pub mod render;

pub use preview::card_preview;
pub use render::render;
