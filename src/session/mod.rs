//! Suggestion session
//!
//! Orchestrates one search box: interaction events go through the selection
//! reducer, and the resulting effects drive the debounce scheduler, the
//! response cache, the backend, the recent-search store, and the resolution
//! pipeline.
//!
//! Supersession is tracked with a generation counter. Every scheduled fetch
//! carries the generation it was issued under; a response is applied to
//! visible state (and written to the cache) only if its generation is still
//! current when it lands, so a later-issued request always wins no matter
//! which response arrives first. Aborting a superseded task is done as well,
//! but only to free resources.

pub(crate) mod debounce;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::{FetchOptions, HttpPlacesBackend, PlacesBackend};
use crate::cache::{suggest_cache_key, ResponseCache};
use crate::config::SuggestSettings;
use crate::error::SuggestError;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::recent::{JsonFileStorage, MemoryStorage, RecentSearches, RecentStorage};
use crate::selection::{
    self, Action, DropdownPhase, InputEvent, ListMode, ReducerCtx, SelectionState,
};
use crate::suggestions::{fill_distances, Suggestion};

use self::debounce::Debouncer;

/// Events emitted to the host UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The visible suggestion list changed.
    SuggestionsChanged {
        suggestions: Vec<Suggestion>,
        mode: ListMode,
    },
    /// A selection was committed, after resolution when one was needed.
    Selected(Suggestion),
}

/// One search box's suggestion engine.
///
/// Cheap to clone; all clones share the same state and event stream.
#[derive(Clone)]
pub struct SuggestSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    settings: SuggestSettings,
    backend: Arc<dyn PlacesBackend>,
    cache: ResponseCache,
    recent: tokio::sync::Mutex<RecentSearches>,
    state: std::sync::Mutex<SelectionState>,
    debounce: Debouncer,
    events: mpsc::UnboundedSender<SessionEvent>,
    metrics: SessionMetrics,
}

impl SuggestSession {
    /// Create a session over a specific backend and recent-search storage.
    pub async fn new(
        settings: SuggestSettings,
        backend: Arc<dyn PlacesBackend>,
        storage: Arc<dyn RecentStorage>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let recent = RecentSearches::load(settings.recent.capacity, storage).await;
        let cache = ResponseCache::new(settings.cache.ttl(), settings.cache.capacity);
        let debounce = Debouncer::new(settings.search.debounce());

        let inner = SessionInner {
            settings,
            backend,
            cache,
            recent: tokio::sync::Mutex::new(recent),
            state: std::sync::Mutex::new(SelectionState::new()),
            debounce,
            events,
            metrics: SessionMetrics::new(),
        };

        (
            Self {
                inner: Arc::new(inner),
            },
            receiver,
        )
    }

    /// Create a session from settings alone, wiring the HTTP backend and the
    /// default persisted recent-search store.
    pub async fn from_settings(
        settings: SuggestSettings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), SuggestError> {
        settings.validate()?;
        let backend = HttpPlacesBackend::new(&settings.backend)
            .map_err(|err| SuggestError::Config(err.to_string()))?;

        let storage: Arc<dyn RecentStorage> = match settings
            .recent
            .path
            .clone()
            .or_else(JsonFileStorage::default_path)
        {
            Some(path) => Arc::new(JsonFileStorage::new(path)),
            None => {
                warn!("No per-user data directory; recent searches will not persist");
                Arc::new(MemoryStorage::new())
            }
        };

        Ok(Self::new(settings, Arc::new(backend), storage).await)
    }

    /// Feed one interaction event through the state machine and carry out
    /// the effects it asks for.
    pub async fn handle(&self, event: InputEvent) {
        let history_available = !self.inner.recent.lock().await.is_empty();
        let ctx = ReducerCtx {
            min_length: self.inner.settings.search.min_length,
            history_available,
        };

        let actions = {
            let mut state = self.lock_state();
            selection::apply(&mut state, event, &ctx)
        };

        for action in actions {
            self.run_action(action).await;
        }
    }

    /// Point-in-time copy of the selection state.
    pub fn snapshot(&self) -> SelectionState {
        self.lock_state().clone()
    }

    /// Point-in-time copy of the session counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    pub fn settings(&self) -> &SuggestSettings {
        &self.inner.settings
    }

    /// Empty the recent-search store.
    pub async fn clear_recent(&self) {
        self.inner.recent.lock().await.clear().await;
    }

    async fn run_action(&self, action: Action) {
        match action {
            Action::ScheduleFetch(query) => self.schedule_fetch(query),
            Action::CancelPending => self.cancel_pending(),
            Action::ShowRecent => self.show_recent().await,
            Action::Resolve(suggestion) => self.spawn_resolution(suggestion),
            Action::Finalize(suggestion) => self.finalize(suggestion).await,
        }
    }

    /// Start the debounce window for a query, superseding any earlier one.
    fn schedule_fetch(&self, query: String) {
        let generation = self.inner.debounce.bump();
        let session = self.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(session.inner.debounce.delay()).await;
            if !session.inner.debounce.is_current(generation) {
                return;
            }
            session.issue(generation, &query).await;
        });

        self.inner.debounce.install(handle);
    }

    /// Run the authoritative fetch for a query, consulting the cache first.
    async fn issue(&self, generation: u64, query: &str) {
        let options = FetchOptions {
            limit: self.inner.settings.search.max_results,
            location: self.inner.settings.search.location,
        };
        let key = suggest_cache_key(query, options.location.as_ref(), options.limit);

        if let Some(cached) = self.inner.cache.get(&key).await {
            self.inner.metrics.record_cache_hit();
            debug!(query, "Serving suggestions from cache");
            self.apply_results(generation, cached);
            return;
        }
        self.inner.metrics.record_cache_miss();
        self.inner.metrics.record_fetch();

        match self.inner.backend.fetch_suggestions(query, &options).await {
            Ok(mut suggestions) => {
                suggestions.truncate(options.limit);
                fill_distances(&mut suggestions, options.location);

                // Only an authoritative response may populate the cache.
                if self.inner.debounce.is_current(generation) {
                    self.inner.cache.put(key, suggestions.clone()).await;
                    self.apply_results(generation, suggestions);
                } else {
                    self.inner.metrics.record_stale_drop();
                    debug!(query, "Dropping superseded suggestion response");
                }
            }
            Err(err) => {
                self.inner.metrics.record_fetch_failure();
                warn!(query, error = %err, "Suggestion fetch failed");

                if self.inner.debounce.is_current(generation) {
                    let mode = {
                        let mut state = self.lock_state();
                        state.loading = false;
                        state.results.clear();
                        state.highlighted = -1;
                        state.phase = DropdownPhase::OpenEmpty;
                        state.mode
                    };
                    self.emit(SessionEvent::SuggestionsChanged {
                        suggestions: Vec::new(),
                        mode,
                    });
                }
            }
        }
    }

    /// Apply a response to visible state if its request is still the
    /// authoritative one.
    fn apply_results(&self, generation: u64, suggestions: Vec<Suggestion>) {
        if !self.inner.debounce.is_current(generation) {
            self.inner.metrics.record_stale_drop();
            return;
        }

        let mode = {
            let mut state = self.lock_state();
            state.loading = false;
            state.highlighted = -1;
            state.mode = ListMode::Live;
            state.phase = if suggestions.is_empty() {
                DropdownPhase::OpenEmpty
            } else {
                DropdownPhase::OpenLive
            };
            state.results = suggestions.clone();
            state.mode
        };

        self.emit(SessionEvent::SuggestionsChanged { suggestions, mode });
    }

    /// Populate the dropdown from the recent-search store.
    async fn show_recent(&self) {
        let suggestions = {
            let recent = self.inner.recent.lock().await;
            recent.list(self.inner.settings.search.max_results)
        };

        // The store may have been cleared since the reducer saw it.
        if suggestions.is_empty() {
            return;
        }

        {
            let mut state = self.lock_state();
            state.results = suggestions.clone();
            state.highlighted = -1;
            state.loading = false;
            state.mode = ListMode::Recent;
            state.phase = DropdownPhase::OpenRecent;
        }

        self.emit(SessionEvent::SuggestionsChanged {
            suggestions,
            mode: ListMode::Recent,
        });
    }

    /// Cancel scheduled or in-flight work and tell the host the list is gone.
    fn cancel_pending(&self) {
        self.inner.debounce.cancel();
        let mode = self.lock_state().mode;
        self.emit(SessionEvent::SuggestionsChanged {
            suggestions: Vec::new(),
            mode,
        });
    }

    /// Resolve a pending suggestion in the background, then commit it.
    ///
    /// On failure the original unresolved data is committed unchanged; a
    /// resolution failure never blocks the selection.
    fn spawn_resolution(&self, suggestion: Suggestion) {
        let place_id = match suggestion.place_id.clone() {
            Some(place_id) => place_id,
            // The reducer only asks for resolution when a place id exists.
            None => return,
        };
        let session = self.clone();

        tokio::spawn(async move {
            session.inner.metrics.record_resolution();

            let resolved = match session.inner.backend.resolve_place(&place_id).await {
                Ok(detail) => suggestion.merged_with(&detail),
                Err(err) => {
                    session.inner.metrics.record_resolution_failure();
                    warn!(
                        place_id = %place_id,
                        error = %err,
                        "Place resolution failed; committing unresolved data"
                    );
                    suggestion.clone()
                }
            };

            {
                let mut state = session.lock_state();
                if state.is_resolving(&suggestion.id) {
                    state.query = resolved.name.clone();
                    state.resolving = None;
                    state.phase = DropdownPhase::Closed;
                    state.highlighted = -1;
                    state.results.clear();
                    state.loading = false;
                }
                // Otherwise a newer interaction took over the dropdown; the
                // commit still completes but leaves visible state alone.
            }

            session.finalize(resolved).await;
        });
    }

    /// Record a committed selection and notify the host.
    async fn finalize(&self, suggestion: Suggestion) {
        {
            let mut recent = self.inner.recent.lock().await;
            recent.record(suggestion.clone()).await;
        }
        self.emit(SessionEvent::Selected(suggestion));
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SelectionState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        if self.inner.events.send(event).is_err() {
            debug!("Session event receiver dropped");
        }
    }
}
