//! TripSuggest: interactive search suggestions for travel planning
//!
//! The client-side engine behind a travel app's destination search box:
//! debounced fetching, last-request-wins supersession, response caching,
//! recent-search fallback, and on-demand resolution of partial results,
//! exposed to host UIs as a pure state machine plus an event stream.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod plans;
pub mod query;
pub mod recent;
pub mod selection;
pub mod session;
pub mod suggestions;

pub use backend::{FetchOptions, HttpPlacesBackend, PlacesBackend};
pub use config::SuggestSettings;
pub use error::SuggestError;
pub use metrics::MetricsSnapshot;
pub use plans::{PlanSearchEvent, PlanSearchSession};
pub use recent::{JsonFileStorage, MemoryStorage, RecentStorage};
pub use selection::{DropdownPhase, InputEvent, ListMode, SelectionState};
pub use session::{SessionEvent, SuggestSession};
pub use suggestions::{GeoPoint, PlaceDetail, PlanSummary, Suggestion};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default delay between the last keystroke and the suggestion fetch, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default time a cached response stays servable, in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default minimum query length before fetches dispatch
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;

/// Default cap on suggestions shown per query
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default number of recent selections kept
pub const DEFAULT_RECENT_CAPACITY: usize = 8;
