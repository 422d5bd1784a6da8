//! Suggestion types for the place-suggestion engine
//!
//! This module defines the core domain structures shared by the cache,
//! the session, and the backend parsing layer.

mod types;

pub use types::*;
