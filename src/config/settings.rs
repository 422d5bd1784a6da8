//! Settings structures for suggestion sessions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SuggestError;
use crate::suggestions::GeoPoint;

/// Main settings structure for a suggestion session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub recent: RecentSettings,
    pub backend: BackendSettings,
}

impl SuggestSettings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SuggestError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|err| SuggestError::storage(path.as_ref(), err))?;
        let settings: SuggestSettings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (TRIPSUGGEST_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("TRIPSUGGEST_BASE_URL") {
            self.backend.base_url = val;
        }
        if let Ok(val) = std::env::var("TRIPSUGGEST_MIN_LENGTH") {
            if let Ok(min_length) = val.parse() {
                self.search.min_length = min_length;
            }
        }
        if let Ok(val) = std::env::var("TRIPSUGGEST_MAX_RESULTS") {
            if let Ok(max_results) = val.parse() {
                self.search.max_results = max_results;
            }
        }
        if let Ok(val) = std::env::var("TRIPSUGGEST_DEBOUNCE_MS") {
            if let Ok(debounce_ms) = val.parse() {
                self.search.debounce_ms = debounce_ms;
            }
        }
        if let Ok(val) = std::env::var("TRIPSUGGEST_RECENT_PATH") {
            self.recent.path = Some(PathBuf::from(val));
        }
    }

    /// Check settings for values the session cannot run with
    pub fn validate(&self) -> Result<(), SuggestError> {
        if self.search.max_results == 0 {
            return Err(SuggestError::Config(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(SuggestError::Config(
                "cache.capacity must be at least 1".to_string(),
            ));
        }
        if self.backend.base_url.is_empty() {
            return Err(SuggestError::Config(
                "backend.base_url must not be empty".to_string(),
            ));
        }
        if !self.backend.timeout_seconds.is_finite() || self.backend.timeout_seconds <= 0.0 {
            return Err(SuggestError::Config(
                "backend.timeout_seconds must be positive".to_string(),
            ));
        }
        if let Some(point) = self.search.location {
            if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lng) {
                return Err(SuggestError::Config(format!(
                    "search.location out of range: {}, {}",
                    point.lat, point.lng
                )));
            }
        }
        Ok(())
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Minimum query length (in characters, after normalization) before a fetch dispatches
    pub min_length: usize,
    /// Cap on suggestions shown per query
    pub max_results: usize,
    /// Debounce delay between the last keystroke and the fetch
    pub debounce_ms: u64,
    /// Device location used for proximity ranking and distance display
    pub location: Option<GeoPoint>,
    /// Whether the host should claim input focus on mount
    pub auto_focus: bool,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_length: crate::DEFAULT_MIN_QUERY_LENGTH,
            max_results: crate::DEFAULT_MAX_RESULTS,
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            location: None,
            auto_focus: false,
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a cached response stays servable
    pub ttl_seconds: u64,
    /// Maximum number of cached responses
    pub capacity: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: crate::DEFAULT_CACHE_TTL_SECS,
            capacity: 512,
        }
    }
}

/// Recent-search store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentSettings {
    /// Maximum number of recent selections kept
    pub capacity: usize,
    /// Where to persist the list; `None` uses the per-user default location
    pub path: Option<PathBuf>,
}

impl Default for RecentSettings {
    fn default() -> Self {
        Self {
            capacity: crate::DEFAULT_RECENT_CAPACITY,
            path: None,
        }
    }
}

/// Travel API backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the travel API
    pub base_url: String,
    /// Transport-level request timeout
    pub timeout_seconds: f64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            timeout_seconds: 10.0,
        }
    }
}
