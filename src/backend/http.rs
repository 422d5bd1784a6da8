//! HTTP places backend
//!
//! Talks to the travel API over HTTP with JSON responses. All endpoints are
//! GET; query text and options travel as query parameters.

use super::normalize;
use super::traits::{FetchOptions, PlacesBackend};
use crate::config::BackendSettings;
use crate::suggestions::{PlaceDetail, PlanSummary, Suggestion};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Places backend speaking the travel API's JSON protocol.
pub struct HttpPlacesBackend {
    client: Client,
    base_url: Url,
}

impl HttpPlacesBackend {
    /// Create a backend from settings.
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid backend base URL: {}", settings.base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.timeout_seconds))
            .gzip(true)
            .user_agent(format!("tripsuggest/{}", crate::VERSION))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {}", path))
    }

    /// Build `api/places/{id}` with the id percent-escaped as a path segment.
    fn place_endpoint(&self, place_id: &str) -> Result<Url> {
        let mut url = self.endpoint("api/places/")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("backend base URL cannot be a base"))?
            .pop_if_empty()
            .push(place_id);
        Ok(url)
    }
}

#[async_trait]
impl PlacesBackend for HttpPlacesBackend {
    async fn fetch_suggestions(
        &self,
        query: &str,
        options: &FetchOptions,
    ) -> Result<Vec<Suggestion>> {
        let url = self.endpoint("api/suggest")?;
        let limit = options.limit.to_string();

        let mut request = self
            .client
            .get(url)
            .query(&[("q", query), ("limit", limit.as_str())]);
        if let Some(point) = options.location {
            let lat = point.lat.to_string();
            let lng = point.lng.to_string();
            request = request.query(&[("lat", lat.as_str()), ("lng", lng.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            bail!("suggest request failed with status {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        Ok(normalize::suggestions_from_response(&body))
    }

    async fn resolve_place(&self, place_id: &str) -> Result<PlaceDetail> {
        let url = self.place_endpoint(place_id)?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            bail!(
                "place lookup for {} failed with status {}",
                place_id,
                response.status()
            );
        }

        let body: serde_json::Value = response.json().await?;
        normalize::place_from_response(&body)
            .ok_or_else(|| anyhow!("place response for {} is missing required fields", place_id))
    }

    async fn search_saved_plans(&self, query: &str) -> Result<Vec<PlanSummary>> {
        let url = self.endpoint("api/plans/search")?;

        let response = self.client.get(url).query(&[("q", query)]).send().await?;
        if !response.status().is_success() {
            bail!("plan search failed with status {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        Ok(normalize::plans_from_response(&body))
    }
}
