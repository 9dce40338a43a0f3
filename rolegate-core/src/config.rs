//! Configuration management
//!
//! Owns the configuration types consumed by the higher-level crates and the
//! TOML load/save plumbing.

use crate::error::{ErrorContext, RolegateError, RolegateResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the rolegate system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolegateConfig {
    /// Authentication settings
    pub auth: AuthSettings,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Settings for the authentication layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Origin hosting the identity endpoints (empty means same-origin relative URLs)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Path a guard should redirect to when a login is required
    pub login_path: String,
    /// Path a guard should redirect to when the user is unauthorized
    pub unauthorized_path: String,
    /// Login providers the site owner has disabled ("aad", "github", ...)
    pub disallowed_login_providers: Vec<String>,
    /// Local development override
    pub dev: DevSettings,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: 30,
            login_path: "/login".to_string(),
            unauthorized_path: "/login".to_string(),
            disallowed_login_providers: Vec::new(),
            dev: DevSettings::default(),
        }
    }
}

/// If `on` is true, `user_override` is used instead of the value resolved
/// from the identity endpoint. Useful for local development without a live
/// identity backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevSettings {
    pub on: bool,
    pub user_override: UserOverride,
}

/// A fixed user for the local development override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserOverride {
    pub identity_provider: String,
    pub user_id: String,
    pub user_details: String,
    pub user_roles: Vec<String>,
}

impl RolegateConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RolegateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RolegateError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: RolegateConfig = toml::from_str(&content).map_err(|e| RolegateError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> RolegateResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| RolegateError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| RolegateError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// `ROLEGATE_BASE_URL` overrides `auth.base_url`, `ROLEGATE_LOG_LEVEL`
    /// overrides `logging.level`.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("ROLEGATE_BASE_URL") {
            self.auth.base_url = base_url;
        }
        if let Ok(level) = std::env::var("ROLEGATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> RolegateResult<()> {
        if self.auth.timeout_seconds == 0 {
            return Err(RolegateError::Config {
                message: "auth.timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set auth.timeout_seconds to a positive value"),
            });
        }

        if !self.auth.login_path.starts_with('/') {
            return Err(RolegateError::Config {
                message: "auth.login_path must be an absolute path".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Prefix auth.login_path with '/'"),
            });
        }

        if !self.auth.unauthorized_path.starts_with('/') {
            return Err(RolegateError::Config {
                message: "auth.unauthorized_path must be an absolute path".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Prefix auth.unauthorized_path with '/'"),
            });
        }

        Ok(())
    }
}

/// Default location of the configuration file (`~/.config/rolegate/config.toml`
/// or the platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rolegate").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RolegateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.login_path, "/login");
        assert_eq!(config.auth.timeout_seconds, 30);
        assert!(!config.auth.dev.on);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = RolegateConfig::default();
        config.auth.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_redirect_paths_are_rejected() {
        let mut config = RolegateConfig::default();
        config.auth.login_path = "login".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = RolegateConfig::default();
        config.auth.base_url = "https://example.test".to_string();
        config.auth.disallowed_login_providers = vec!["twitter".to_string()];
        config.auth.dev.on = true;
        config.auth.dev.user_override.user_id = "dev-user".to_string();
        config.auth.dev.user_override.user_roles =
            vec!["authenticated".to_string(), "global_admin".to_string()];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        config.save_to_file(&path).unwrap();

        let loaded = RolegateConfig::from_file(&path).unwrap();
        assert_eq!(loaded.auth.base_url, "https://example.test");
        assert_eq!(loaded.auth.disallowed_login_providers, vec!["twitter"]);
        assert!(loaded.auth.dev.on);
        assert_eq!(loaded.auth.dev.user_override.user_roles.len(), 2);
    }
}
