//! Data access layer for the remote read-only PokeAPI.
//!
//! Layered as: serde wire types, a thin HTTP client, and a cached client
//! that routes every read through the expiring cache and builds the derived
//! structures (evolution lines, name search) on top.

mod cached_client;
mod client;
mod error;
mod keys;
pub mod types;

pub use cached_client::{flatten_chain, CachedClient, SEARCH_UNIVERSE};
pub use client::{PokeClient, API_BASE_URL};
pub use error::ApiError;
