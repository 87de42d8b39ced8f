//! Jikan API v4 client implementation.
//!
//! This module provides a thin client for the Jikan API (MyAnimeList
//! unofficial API) and the wire types it decodes.

pub mod client;
pub mod types;

pub use client::JikanClient;
pub use types::*;
