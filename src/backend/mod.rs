//! Travel-places backend
//!
//! The session talks to the travel API through the [`PlacesBackend`] trait;
//! [`HttpPlacesBackend`] is the production implementation. Response bodies
//! are normalized defensively since field shapes vary between API versions.

mod http;
mod normalize;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use http::HttpPlacesBackend;
pub use traits::{FetchOptions, PlacesBackend};
