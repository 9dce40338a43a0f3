//! Rolegate Core - Error, logging and configuration foundation
//!
//! This crate defines the ambient infrastructure shared across the rolegate
//! system:
//!
//! - Structured error handling with context and recovery suggestions
//! - Configurable tracing-based logging
//! - TOML-backed configuration with environment overrides

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
