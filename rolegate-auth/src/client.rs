//! Identity endpoint client
//!
//! Talks to the platform's well-known identity endpoints: `GET /.auth/me`
//! for the client principal, plus the login/logout navigation targets.
//! This is the only network surface of the system.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::principal::{AuthMeResponse, ClientPrincipal};
use crate::{AuthError, AuthResult};

/// Login providers supported by the identity platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginProvider {
    Aad,
    Facebook,
    GitHub,
    Google,
    Twitter,
}

impl LoginProvider {
    pub const ALL: [LoginProvider; 5] = [
        LoginProvider::Aad,
        LoginProvider::Facebook,
        LoginProvider::GitHub,
        LoginProvider::Google,
        LoginProvider::Twitter,
    ];
}

impl std::fmt::Display for LoginProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginProvider::Aad => write!(f, "aad"),
            LoginProvider::Facebook => write!(f, "facebook"),
            LoginProvider::GitHub => write!(f, "github"),
            LoginProvider::Google => write!(f, "google"),
            LoginProvider::Twitter => write!(f, "twitter"),
        }
    }
}

impl std::str::FromStr for LoginProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aad" => Ok(LoginProvider::Aad),
            "facebook" => Ok(LoginProvider::Facebook),
            "github" => Ok(LoginProvider::GitHub),
            "google" => Ok(LoginProvider::Google),
            "twitter" => Ok(LoginProvider::Twitter),
            _ => Err(format!("Unknown login provider: {}", s)),
        }
    }
}

/// Configuration for the identity client
#[derive(Debug, Clone)]
pub struct IdentityClientConfig {
    /// Origin hosting the `/.auth` endpoints (no trailing slash required)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for IdentityClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: 30,
            user_agent: "rolegate/0.1".to_string(),
        }
    }
}

impl IdentityClientConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set user agent
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl From<&rolegate_core::AuthSettings> for IdentityClientConfig {
    fn from(settings: &rolegate_core::AuthSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout_seconds: settings.timeout_seconds,
            ..Default::default()
        }
    }
}

/// Anything the authentication provider can resolve a principal from.
///
/// Implemented by [`IdentityClient`] for the live endpoint and by
/// [`StaticPrincipalSource`] for local development and tests.
#[async_trait]
pub trait PrincipalSource: Send + Sync {
    async fn resolve_principal(&self) -> AuthResult<ClientPrincipal>;
}

/// Join a path under the `/.auth` prefix of the given origin
pub(crate) fn auth_endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/.auth/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP client for the identity endpoints
pub struct IdentityClient {
    client: reqwest::Client,
    config: IdentityClientConfig,
}

impl IdentityClient {
    /// Create a new identity client
    pub fn new(config: IdentityClientConfig) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| AuthError::ClientBuild {
                message: e.to_string(),
            })?;

        debug!("Created identity client for {:?}", config.base_url);

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        auth_endpoint(&self.config.base_url, path)
    }

    /// URL of the client principal endpoint
    pub fn me_url(&self) -> String {
        self.endpoint("me")
    }

    /// Navigation target that starts a login with the given provider
    pub fn login_url(&self, provider: LoginProvider) -> String {
        self.endpoint(&format!("login/{}", provider))
    }

    /// Navigation target that ends the session
    pub fn logout_url(&self) -> String {
        self.endpoint("logout")
    }

    /// Fetch the current client principal from `/.auth/me`.
    ///
    /// A missing or null principal in a successful response resolves to the
    /// empty sentinel (not logged in). Transport failures and non-success
    /// statuses, as well as bodies that do not parse as the expected
    /// envelope, surface as descriptive errors.
    pub async fn fetch_client_principal(&self) -> AuthResult<ClientPrincipal> {
        let url = self.me_url();
        debug!("Fetching client principal from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::LoginService {
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "Identity endpoint returned a failure status"
            );
            return Err(AuthError::LoginService { source: None });
        }

        let envelope: AuthMeResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::MalformedResponse {
                    source: Some(Box::new(e)),
                })?;

        Ok(envelope.into_principal())
    }
}

#[async_trait]
impl PrincipalSource for IdentityClient {
    async fn resolve_principal(&self) -> AuthResult<ClientPrincipal> {
        self.fetch_client_principal().await
    }
}

/// A source that always resolves to a fixed principal, without any network
/// traffic. Backs the local development override and provider tests.
#[derive(Debug, Clone)]
pub struct StaticPrincipalSource {
    principal: ClientPrincipal,
}

impl StaticPrincipalSource {
    pub fn new(principal: ClientPrincipal) -> Self {
        Self { principal }
    }
}

#[async_trait]
impl PrincipalSource for StaticPrincipalSource {
    async fn resolve_principal(&self) -> AuthResult<ClientPrincipal> {
        Ok(self.principal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles;

    #[test]
    fn endpoint_urls_join_without_doubled_slashes() {
        let client =
            IdentityClient::new(IdentityClientConfig::new("https://example.test/")).unwrap();
        assert_eq!(client.me_url(), "https://example.test/.auth/me");
        assert_eq!(
            client.login_url(LoginProvider::GitHub),
            "https://example.test/.auth/login/github"
        );
        assert_eq!(client.logout_url(), "https://example.test/.auth/logout");
    }

    #[test]
    fn relative_urls_are_produced_without_a_base() {
        let client = IdentityClient::new(IdentityClientConfig::default()).unwrap();
        assert_eq!(client.me_url(), "/.auth/me");
        assert_eq!(client.login_url(LoginProvider::Aad), "/.auth/login/aad");
    }

    #[test]
    fn provider_names_round_trip() {
        for provider in LoginProvider::ALL {
            let parsed: LoginProvider = provider.to_string().parse().unwrap();
            assert_eq!(parsed, provider);
        }
        assert!("myspace".parse::<LoginProvider>().is_err());
    }

    #[test]
    fn config_builders_apply() {
        let config = IdentityClientConfig::new("https://example.test")
            .with_timeout(5)
            .with_user_agent("test-agent");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[tokio::test]
    async fn static_source_resolves_its_principal() {
        let principal = ClientPrincipal::new(
            "aad",
            "42",
            "dev",
            roles::roles([roles::AUTHENTICATED]),
        );
        let source = StaticPrincipalSource::new(principal.clone());
        assert_eq!(source.resolve_principal().await.unwrap(), principal);
    }
}
