//! Backend traits and fetch options

use crate::suggestions::{GeoPoint, PlaceDetail, PlanSummary, Suggestion};
use anyhow::Result;
use async_trait::async_trait;

/// Parameters for a suggestion fetch
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum number of suggestions to return
    pub limit: usize,
    /// Approximate device location for proximity ranking
    pub location: Option<GeoPoint>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: crate::DEFAULT_MAX_RESULTS,
            location: None,
        }
    }
}

/// Trait for travel-place suggestion providers
#[async_trait]
pub trait PlacesBackend: Send + Sync {
    /// Fetch suggestions matching a query.
    async fn fetch_suggestions(
        &self,
        query: &str,
        options: &FetchOptions,
    ) -> Result<Vec<Suggestion>>;

    /// Resolve full details for a place returned as pending.
    async fn resolve_place(&self, place_id: &str) -> Result<PlaceDetail>;

    /// Search the user's saved trip plans.
    async fn search_saved_plans(&self, query: &str) -> Result<Vec<PlanSummary>>;
}
