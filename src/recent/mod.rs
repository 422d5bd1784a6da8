//! Recent-search store
//!
//! Keeps a bounded, most-recent-first list of committed selections and
//! persists it across sessions. Persistence failures are logged and the
//! in-memory list keeps working, so a broken disk never breaks search.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::error::SuggestError;
use crate::suggestions::Suggestion;

/// A committed selection with the time it was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSearchRecord {
    pub suggestion: Suggestion,
    pub recorded_at: DateTime<Utc>,
}

/// Backing storage for the recent-search list.
#[async_trait]
pub trait RecentStorage: Send + Sync {
    /// Load all persisted records, most recent first.
    async fn load(&self) -> Result<Vec<RecentSearchRecord>, SuggestError>;

    /// Replace the persisted records with the given list.
    async fn save(&self, records: &[RecentSearchRecord]) -> Result<(), SuggestError>;

    /// Remove all persisted records.
    async fn clear(&self) -> Result<(), SuggestError>;
}

/// JSON-file storage under a host-provided path.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default per-user location for the recent-search file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("tripsuggest").join("recent_searches.json"))
    }
}

#[async_trait]
impl RecentStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<RecentSearchRecord>, SuggestError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(SuggestError::storage(&self.path, err)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, records: &[RecentSearchRecord]) -> Result<(), SuggestError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| SuggestError::storage(parent, err))?;
        }
        let bytes = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|err| SuggestError::storage(&self.path, err))
    }

    async fn clear(&self) -> Result<(), SuggestError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SuggestError::storage(&self.path, err)),
        }
    }
}

/// In-memory storage for hosts that opt out of persistence.
#[derive(Default)]
pub struct MemoryStorage {
    records: std::sync::Mutex<Vec<RecentSearchRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecentStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<RecentSearchRecord>, SuggestError> {
        Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn save(&self, records: &[RecentSearchRecord]) -> Result<(), SuggestError> {
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records.to_vec();
        Ok(())
    }

    async fn clear(&self) -> Result<(), SuggestError> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clear();
        Ok(())
    }
}

/// Bounded most-recent-first list of committed selections.
pub struct RecentSearches {
    records: VecDeque<RecentSearchRecord>,
    capacity: usize,
    storage: Arc<dyn RecentStorage>,
}

impl RecentSearches {
    /// Load the persisted list, falling back to empty on storage errors.
    pub async fn load(capacity: usize, storage: Arc<dyn RecentStorage>) -> Self {
        let records = match storage.load().await {
            Ok(records) => records,
            Err(err) => {
                warn!("Failed to load recent searches: {}", err);
                Vec::new()
            }
        };
        let mut records: VecDeque<_> = records.into();
        records.truncate(capacity);

        Self {
            records,
            capacity,
            storage,
        }
    }

    /// Record a committed selection, deduplicating by suggestion id.
    pub async fn record(&mut self, suggestion: Suggestion) {
        self.records.retain(|record| record.suggestion.id != suggestion.id);
        self.records.push_front(RecentSearchRecord {
            suggestion,
            recorded_at: Utc::now(),
        });
        self.records.truncate(self.capacity);
        self.persist().await;
    }

    /// Most recent selections first, at most `limit` of them.
    pub fn list(&self, limit: usize) -> Vec<Suggestion> {
        self.records
            .iter()
            .take(limit)
            .map(|record| record.suggestion.clone())
            .collect()
    }

    /// Drop all records, in memory and in storage.
    pub async fn clear(&mut self) {
        self.records.clear();
        if let Err(err) = self.storage.clear().await {
            warn!("Failed to clear recent searches: {}", err);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    async fn persist(&self) {
        let records: Vec<_> = self.records.iter().cloned().collect();
        if let Err(err) = self.storage.save(&records).await {
            warn!("Failed to persist recent searches: {}", err);
        }
    }
}
