//! Selection state machine
//!
//! A pure reducer over the search box's dropdown state. Hosts adapt raw UI
//! events (keydown, focus, pointer) into [`InputEvent`]s, feed them through
//! [`apply`], and carry out the returned [`Action`]s. All async work lives
//! behind the actions, which keeps every transition testable without a
//! runtime.

use crate::suggestions::Suggestion;

/// Which list the dropdown is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Fetched results for the current query.
    #[default]
    Live,
    /// Recent-search fallback for an empty query.
    Recent,
}

/// Dropdown visibility phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownPhase {
    #[default]
    Closed,
    /// Open and showing fetched results.
    OpenLive,
    /// Open and showing recent-search history.
    OpenRecent,
    /// Open with zero results for a query at or above the threshold.
    OpenEmpty,
}

/// Interaction events fed to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The input's text changed.
    QueryChanged(String),
    /// The input gained focus.
    Focused,
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    /// Pointer event outside the input/dropdown region.
    OutsideClick,
    /// Explicit clear control.
    Clear,
}

/// Effects the host must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start (or reset) the debounced fetch for this query.
    ScheduleFetch(String),
    /// Cancel any scheduled or in-flight fetch.
    CancelPending,
    /// Populate the dropdown from the recent-search store.
    ShowRecent,
    /// Resolve a pending suggestion before committing it.
    Resolve(Suggestion),
    /// Commit a selection: record it and notify the host.
    Finalize(Suggestion),
}

/// Context the reducer needs beyond the state itself.
#[derive(Debug, Clone, Copy)]
pub struct ReducerCtx {
    /// Minimum normalized query length before fetches dispatch.
    pub min_length: usize,
    /// Whether the recent-search store has anything to show.
    pub history_available: bool,
}

/// Full selection state for one search box.
#[derive(Debug, Clone)]
pub struct SelectionState {
    /// Current input text.
    pub query: String,
    /// Suggestions currently shown (live or recent, per `mode`).
    pub results: Vec<Suggestion>,
    /// Highlighted row, `-1` meaning none. Clamped to `[-1, len - 1]`.
    pub highlighted: isize,
    pub phase: DropdownPhase,
    pub mode: ListMode,
    /// Id of the suggestion whose resolution is in flight, if any.
    pub resolving: Option<String>,
    /// Whether a fetch is scheduled or in flight for the current query.
    pub loading: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            highlighted: -1,
            phase: DropdownPhase::Closed,
            mode: ListMode::Live,
            resolving: None,
            loading: false,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.phase != DropdownPhase::Closed
    }

    /// The suggestion under the highlight, if any row is highlighted.
    pub fn highlighted_suggestion(&self) -> Option<&Suggestion> {
        if self.highlighted < 0 {
            return None;
        }
        self.results.get(self.highlighted as usize)
    }

    /// Whether the given row should show its resolving indicator.
    pub fn is_resolving(&self, suggestion_id: &str) -> bool {
        self.resolving.as_deref() == Some(suggestion_id)
    }

    /// Close the dropdown and reset per-dropdown state. The query and the
    /// resolving marker are left to the caller.
    fn close(&mut self) {
        self.phase = DropdownPhase::Closed;
        self.highlighted = -1;
        self.results.clear();
        self.loading = false;
    }
}

/// Apply one event to the state, returning the effects to carry out.
pub fn apply(state: &mut SelectionState, event: InputEvent, ctx: &ReducerCtx) -> Vec<Action> {
    match event {
        InputEvent::QueryChanged(query) => {
            state.query = query;
            state.highlighted = -1;
            state.results.clear();
            state.resolving = None;

            if crate::query::meets_threshold(&state.query, ctx.min_length) {
                state.loading = true;
                state.mode = ListMode::Live;
                if state.is_open() {
                    state.phase = DropdownPhase::OpenLive;
                }
                vec![Action::ScheduleFetch(state.query.clone())]
            } else {
                state.loading = false;
                state.phase = DropdownPhase::Closed;
                vec![Action::CancelPending]
            }
        }
        InputEvent::Focused => {
            if !state.is_open() && state.query.trim().is_empty() && ctx.history_available {
                vec![Action::ShowRecent]
            } else {
                Vec::new()
            }
        }
        InputEvent::ArrowDown => {
            if !state.is_open() {
                if state.query.trim().is_empty() && ctx.history_available {
                    return vec![Action::ShowRecent];
                }
                return Vec::new();
            }
            let last = state.results.len() as isize - 1;
            state.highlighted = (state.highlighted + 1).min(last);
            Vec::new()
        }
        InputEvent::ArrowUp => {
            if state.is_open() {
                state.highlighted = (state.highlighted - 1).max(-1);
            }
            Vec::new()
        }
        InputEvent::Enter => {
            // A commit is already being honored; further commits wait for it.
            if !state.is_open() || state.resolving.is_some() {
                return Vec::new();
            }
            let chosen = match state.highlighted_suggestion() {
                Some(suggestion) => suggestion.clone(),
                None => return Vec::new(),
            };

            if chosen.is_pending() && chosen.place_id.is_some() {
                // Dropdown stays open with this row marked resolving; it
                // closes when the resolved selection is emitted.
                state.resolving = Some(chosen.id.clone());
                return vec![Action::Resolve(chosen)];
            }

            state.query = chosen.name.clone();
            state.close();
            vec![Action::Finalize(chosen)]
        }
        InputEvent::Escape | InputEvent::OutsideClick => {
            state.close();
            state.resolving = None;
            vec![Action::CancelPending]
        }
        InputEvent::Clear => {
            state.query.clear();
            state.close();
            state.resolving = None;
            vec![Action::CancelPending]
        }
    }
}
