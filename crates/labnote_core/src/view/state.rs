//! Shell view state as an immutable struct plus a pure reducer.
//!
//! # Invariants
//! - `reduce` never mutates its input; it returns the next state.
//! - The view model is derived from state + collection on every call.

use crate::markdown::render;
use crate::model::entry::{Entry, EntryId, EntryStatus};
use crate::query::{entry_stats, run_query, EntryQuery, EntryStats};

/// Layout of the entry list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Vertical list with inline expansion of the selected entry.
    #[default]
    Timeline,
    /// Card grid with a side detail panel.
    Grid,
}

/// Everything the shell needs to rebuild its view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub tag_filter: Option<String>,
    pub status_filter: Option<EntryStatus>,
    pub selected: Option<EntryId>,
    pub layout: Layout,
    pub sidebar_collapsed: bool,
    /// Entry whose delete confirmation is currently shown.
    pub confirm_delete: Option<EntryId>,
}

impl ViewState {
    /// Returns the pipeline query encoded by this state.
    pub fn query(&self) -> EntryQuery {
        EntryQuery {
            search: self.search.clone(),
            tag: self.tag_filter.clone(),
            status: self.status_filter,
        }
    }
}

/// User intents handled by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetSearch(String),
    /// Selects a tag filter; toggling the active tag clears it.
    ToggleTag(String),
    SetStatus(Option<EntryStatus>),
    /// Selects an entry; selecting the selected entry collapses it.
    Select(EntryId),
    /// Escape: closes the detail view.
    ClearSelection,
    SetLayout(Layout),
    ToggleSidebar,
    /// Opens the delete confirmation; repeating it closes the prompt.
    RequestDelete(EntryId),
    CancelDelete,
    /// The shell removed the entry from the collection.
    EntryDeleted(EntryId),
}

/// Computes the next view state.
pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let mut next = state.clone();
    match action {
        Action::SetSearch(search) => next.search = search,
        Action::ToggleTag(tag) => {
            next.tag_filter = if state.tag_filter.as_deref() == Some(tag.as_str()) {
                None
            } else {
                Some(tag)
            };
        }
        Action::SetStatus(status) => next.status_filter = status,
        Action::Select(id) => {
            next.selected = if state.selected.as_deref() == Some(id.as_str()) {
                None
            } else {
                Some(id)
            };
        }
        Action::ClearSelection => next.selected = None,
        Action::SetLayout(layout) => next.layout = layout,
        Action::ToggleSidebar => next.sidebar_collapsed = !state.sidebar_collapsed,
        Action::RequestDelete(id) => {
            next.confirm_delete = if state.confirm_delete.as_deref() == Some(id.as_str()) {
                None
            } else {
                Some(id)
            };
        }
        Action::CancelDelete => next.confirm_delete = None,
        Action::EntryDeleted(id) => {
            if state.selected.as_deref() == Some(id.as_str()) {
                next.selected = None;
            }
            next.confirm_delete = None;
        }
    }
    next
}

/// Derived data for one render of the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel<'a> {
    pub visible: Vec<&'a Entry>,
    pub vocabulary: Vec<String>,
    pub stats: EntryStats,
    pub selected: Option<&'a Entry>,
    /// Rendered body of the selected entry.
    pub selected_markup: Option<String>,
}

/// Runs the query pipeline and renders the selected entry body.
///
/// A selection pointing at a deleted entry yields `selected = None`.
pub fn view_model<'a>(state: &ViewState, entries: &'a [Entry]) -> ViewModel<'a> {
    let view = run_query(entries, &state.query());
    let selected = state
        .selected
        .as_deref()
        .and_then(|id| entries.iter().find(|entry| entry.id == id));
    let selected_markup = selected.map(|entry| render(&entry.body, &entry.images));

    ViewModel {
        visible: view.visible,
        vocabulary: view.vocabulary,
        stats: entry_stats(entries),
        selected,
        selected_markup,
    }
}
