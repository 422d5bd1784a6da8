//! Scripted in-process backend for exercising session behavior in tests.

use super::traits::{FetchOptions, PlacesBackend};
use crate::suggestions::{PlaceDetail, PlanSummary, Suggestion};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Backend whose responses, delays, and failures are scripted per query.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    responses: Mutex<HashMap<String, Vec<Suggestion>>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashSet<String>>,
    places: Mutex<HashMap<String, PlaceDetail>>,
    place_failures: Mutex<HashSet<String>>,
    place_delay: Mutex<Option<Duration>>,
    plans: Mutex<Vec<PlanSummary>>,
    plan_failure: Mutex<bool>,
    fetch_calls: AtomicUsize,
    plan_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, query: &str, suggestions: Vec<Suggestion>) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), suggestions);
    }

    pub fn delay(&self, query: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
    }

    pub fn fail(&self, query: &str) {
        self.failures.lock().unwrap().insert(query.to_string());
    }

    pub fn place(&self, place_id: &str, detail: PlaceDetail) {
        self.places
            .lock()
            .unwrap()
            .insert(place_id.to_string(), detail);
    }

    pub fn fail_place(&self, place_id: &str) {
        self.place_failures
            .lock()
            .unwrap()
            .insert(place_id.to_string());
    }

    pub fn delay_places(&self, delay: Duration) {
        *self.place_delay.lock().unwrap() = Some(delay);
    }

    pub fn plans(&self, plans: Vec<PlanSummary>) {
        *self.plans.lock().unwrap() = plans;
    }

    pub fn fail_plans(&self) {
        *self.plan_failure.lock().unwrap() = true;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn plan_count(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlacesBackend for ScriptedBackend {
    async fn fetch_suggestions(
        &self,
        query: &str,
        _options: &FetchOptions,
    ) -> Result<Vec<Suggestion>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failures.lock().unwrap().contains(query) {
            bail!("scripted fetch failure for {:?}", query);
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_place(&self, place_id: &str) -> Result<PlaceDetail> {
        let delay = *self.place_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.place_failures.lock().unwrap().contains(place_id) {
            bail!("scripted resolution failure for {:?}", place_id);
        }

        match self.places.lock().unwrap().get(place_id) {
            Some(detail) => Ok(detail.clone()),
            None => bail!("no scripted place for {:?}", place_id),
        }
    }

    async fn search_saved_plans(&self, _query: &str) -> Result<Vec<PlanSummary>> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);

        if *self.plan_failure.lock().unwrap() {
            bail!("scripted plan search failure");
        }

        Ok(self.plans.lock().unwrap().clone())
    }
}
