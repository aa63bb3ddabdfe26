//! Shared types, errors, and configuration for Centra.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Validated currency codes
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::{AnalyticConfig, AppConfig, LoggingConfig};
pub use error::{AppError, AppResult};
pub use telemetry::init_tracing;
