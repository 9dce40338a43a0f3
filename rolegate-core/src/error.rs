//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type RolegateResult<T> = Result<T, RolegateError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the rolegate system
#[derive(Error, Debug)]
pub enum RolegateError {
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Authorization error: {message}")]
    Authorization {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl RolegateError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            RolegateError::Auth { context, .. } => Some(context),
            RolegateError::Authorization { context, .. } => Some(context),
            RolegateError::Config { context, .. } => Some(context),
            RolegateError::Network { context, .. } => Some(context),
            RolegateError::Validation { context, .. } => Some(context),
            RolegateError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            RolegateError::Network { .. } => true,
            RolegateError::Auth { .. } => false,
            RolegateError::Authorization { .. } => false,
            RolegateError::Config { .. } => false,
            RolegateError::Validation { .. } => false,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            RolegateError::Internal { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Internal error occurred"
                );
            }
            RolegateError::Config { .. } | RolegateError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            RolegateError::Network { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Network error (may be recoverable)"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! auth_error {
    ($msg:expr, $component:expr) => {
        RolegateError::Auth {
            message: $msg.to_string(),
            source: None,
            context: ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        RolegateError::Auth {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        RolegateError::Config {
            message: $msg.to_string(),
            source: None,
            context: ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Delete the file to regenerate the defaults"),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_context_carries_component_and_suggestions() {
        let context = ErrorContext::new("provider")
            .with_operation("mount")
            .with_metadata("endpoint", "/.auth/me")
            .with_suggestion("Check that the identity endpoint is reachable");

        assert_eq!(context.component, "provider");
        assert_eq!(context.operation.as_deref(), Some("mount"));
        assert_eq!(context.metadata.get("endpoint").map(String::as_str), Some("/.auth/me"));
        assert_eq!(context.recovery_suggestions.len(), 1);
        assert!(!context.error_id.is_empty());
    }

    #[test]
    fn auth_errors_format_with_message() {
        let err = RolegateError::Auth {
            message: "login service unavailable".to_string(),
            source: None,
            context: ErrorContext::new("client"),
        };
        assert_eq!(err.to_string(), "Authentication error: login service unavailable");
        assert!(!err.is_recoverable());
        assert!(err.context().is_some());
    }

    #[test]
    fn network_errors_are_recoverable() {
        let err = RolegateError::Network {
            message: "connection refused".to_string(),
            source: None,
            context: ErrorContext::new("client"),
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn io_errors_have_no_context() {
        let err = RolegateError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.context().is_none());
    }
}
