//! Shared library for the catalog browser workspace.
//!
//! This crate provides common functionality used by the browser crate:
//! - Configuration management
//! - Catalog domain models
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
