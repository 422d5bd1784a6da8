//! Saved-plan search
//!
//! A second, simpler search surface over the user's saved trip plans. It
//! shares the debounce and supersession discipline of the suggestion
//! session but has no cache and no resolution pipeline; failures just show
//! an empty list.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::PlacesBackend;
use crate::config::SuggestSettings;
use crate::session::debounce::Debouncer;
use crate::suggestions::PlanSummary;

/// Events emitted to the host UI.
#[derive(Debug, Clone)]
pub enum PlanSearchEvent {
    ResultsChanged(Vec<PlanSummary>),
}

/// Debounced search over saved trip plans.
///
/// Cheap to clone; all clones share the same scheduler and event stream.
#[derive(Clone)]
pub struct PlanSearchSession {
    inner: Arc<PlanInner>,
}

struct PlanInner {
    backend: Arc<dyn PlacesBackend>,
    min_length: usize,
    debounce: Debouncer,
    events: mpsc::UnboundedSender<PlanSearchEvent>,
}

impl PlanSearchSession {
    pub fn new(
        settings: &SuggestSettings,
        backend: Arc<dyn PlacesBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<PlanSearchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let inner = PlanInner {
            backend,
            min_length: settings.search.min_length,
            debounce: Debouncer::new(settings.search.debounce()),
            events,
        };

        (
            Self {
                inner: Arc::new(inner),
            },
            receiver,
        )
    }

    /// Update the query, debouncing the plan search.
    ///
    /// Sub-threshold queries cancel outstanding work and clear the list
    /// immediately instead of debouncing the clear.
    pub fn set_query(&self, query: &str) {
        if !crate::query::meets_threshold(query, self.inner.min_length) {
            self.inner.debounce.cancel();
            self.emit(Vec::new());
            return;
        }

        let generation = self.inner.debounce.bump();
        let session = self.clone();
        let query = query.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(session.inner.debounce.delay()).await;
            if !session.inner.debounce.is_current(generation) {
                return;
            }

            let results = match session.inner.backend.search_saved_plans(&query).await {
                Ok(results) => results,
                Err(err) => {
                    warn!(query, error = %err, "Plan search failed");
                    Vec::new()
                }
            };

            if session.inner.debounce.is_current(generation) {
                session.emit(results);
            }
        });

        self.inner.debounce.install(handle);
    }

    /// Cancel any scheduled or in-flight search and clear the list.
    pub fn clear(&self) {
        self.inner.debounce.cancel();
        self.emit(Vec::new());
    }

    fn emit(&self, results: Vec<PlanSummary>) {
        if self
            .inner
            .events
            .send(PlanSearchEvent::ResultsChanged(results))
            .is_err()
        {
            debug!("Plan search receiver dropped");
        }
    }
}
