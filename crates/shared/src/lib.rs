//! Shared library for the anime API workspace.
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management
//! - Domain models returned by the API
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
