//! Shell-facing view state.
//!
//! # Responsibility
//! - Model filter/selection/layout state as plain data with a pure reducer.
//! - Derive the view model from state and the entry collection.

pub mod state;

pub use state::{reduce, view_model, Action, Layout, ViewModel, ViewState};
