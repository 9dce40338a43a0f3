//! Authentication provider
//!
//! The asynchronous state machine behind every guard: on mount it issues a
//! single request to the identity endpoint, then publishes one settled
//! context snapshot. Consumers read the snapshot through [`AuthHandle`],
//! the ambient-context accessor. Multiple providers coexist independently;
//! nothing here is process-global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use rolegate_core::AuthSettings;

use crate::client::{
    auth_endpoint, IdentityClient, LoginProvider, PrincipalSource, StaticPrincipalSource,
};
use crate::principal::ClientPrincipal;
use crate::{AuthError, AuthResult};

/// One immutable view of the authentication state.
///
/// A snapshot is either the pre-resolution state (`is_authenticating` with
/// the empty user) or a fully settled state. Consumers never observe a
/// half-updated value: each resolution publishes exactly one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// The resolved user (empty sentinel until settled)
    pub user: ClientPrincipal,
    /// True only while the single resolution request is in flight
    pub is_authenticating: bool,
    /// Derived: true iff the user holds at least one role
    pub is_logged_in: bool,
    /// Resolution failure, if any (the user is then the empty sentinel)
    pub error: Option<String>,
}

impl AuthSnapshot {
    /// The initial pre-resolution state
    pub fn authenticating() -> Self {
        Self {
            user: ClientPrincipal::empty(),
            is_authenticating: true,
            is_logged_in: false,
            error: None,
        }
    }

    /// A settled state carrying the resolved user
    pub fn settled(user: ClientPrincipal) -> Self {
        Self {
            is_logged_in: user.is_logged_in(),
            user,
            is_authenticating: false,
            error: None,
        }
    }

    /// A settled failure state: empty user plus the surfaced error
    pub fn failed(message: String) -> Self {
        Self {
            user: ClientPrincipal::empty(),
            is_authenticating: false,
            is_logged_in: false,
            error: Some(message),
        }
    }
}

/// Outcome of a login action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// Already logged in; the context was refreshed from the endpoint
    Refreshed,
    /// The host should navigate to this URL
    Navigate(String),
}

/// The authentication state machine.
///
/// Owns the published context value. Create one per guarded subtree, call
/// [`mount`](AuthProvider::mount) (or
/// [`spawn_mount`](AuthProvider::spawn_mount)) once, and hand out
/// [`AuthHandle`]s to consumers.
pub struct AuthProvider {
    source: Arc<dyn PrincipalSource>,
    settings: AuthSettings,
    disallowed: Vec<LoginProvider>,
    tx: watch::Sender<AuthSnapshot>,
    // Held so publishing never observes a receiver-less channel
    rx: watch::Receiver<AuthSnapshot>,
    mounted: AtomicBool,
    started: AtomicBool,
}

impl AuthProvider {
    /// Create a provider from settings.
    ///
    /// With `settings.dev.on` the configured override user is used and no
    /// network request is ever issued.
    pub fn new(settings: AuthSettings) -> AuthResult<Arc<Self>> {
        let source: Arc<dyn PrincipalSource> = if settings.dev.on {
            info!("Dev override enabled; identity endpoint will not be called");
            Arc::new(StaticPrincipalSource::new(ClientPrincipal::from(
                &settings.dev.user_override,
            )))
        } else {
            Arc::new(IdentityClient::new((&settings).into())?)
        };
        Ok(Self::with_source(settings, source))
    }

    /// Create a provider that resolves from the given fixed user
    pub fn with_override(settings: AuthSettings, user: ClientPrincipal) -> Arc<Self> {
        Self::with_source(settings, Arc::new(StaticPrincipalSource::new(user)))
    }

    /// Create a provider over an arbitrary principal source
    pub fn with_source(settings: AuthSettings, source: Arc<dyn PrincipalSource>) -> Arc<Self> {
        let disallowed = settings
            .disallowed_login_providers
            .iter()
            .filter_map(|name| match name.parse::<LoginProvider>() {
                Ok(provider) => Some(provider),
                Err(e) => {
                    warn!("Ignoring disallowed login provider entry: {}", e);
                    None
                }
            })
            .collect();

        let (tx, rx) = watch::channel(AuthSnapshot::authenticating());
        Arc::new(Self {
            source,
            settings,
            disallowed,
            tx,
            rx,
            mounted: AtomicBool::new(true),
            started: AtomicBool::new(false),
        })
    }

    /// Get an ambient-context accessor for consumers
    pub fn handle(&self) -> AuthHandle {
        AuthHandle {
            rx: self.rx.clone(),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> AuthSnapshot {
        self.rx.borrow().clone()
    }

    /// Resolve the user and settle the context. Exactly one resolution per
    /// mount; repeated calls are no-ops.
    pub async fn mount(&self) {
        if !self.begin_mount() {
            return;
        }
        let resolved = self.source.resolve_principal().await;
        self.settle(resolved);
    }

    /// Run [`mount`](AuthProvider::mount) on the runtime.
    ///
    /// Takes a clone of the provider's `Arc` but the task keeps only a weak
    /// reference, so tearing the provider down while the request is in
    /// flight suppresses the publish instead of updating a dead context.
    pub fn spawn_mount(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        if !self.begin_mount() {
            return tokio::spawn(async {});
        }
        let weak = Arc::downgrade(&self);
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let resolved = source.resolve_principal().await;
            match weak.upgrade() {
                Some(provider) => provider.settle(resolved),
                None => debug!("Provider dropped before resolution; discarding result"),
            }
        })
    }

    fn begin_mount(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("mount called more than once; ignoring");
            return false;
        }
        true
    }

    /// Begin a login with the given provider.
    ///
    /// Fails if the site owner disabled the provider. When the user is
    /// already logged in this re-enters the authenticating state and
    /// refreshes from the endpoint; otherwise the caller receives the login
    /// URL to navigate to.
    pub async fn login(&self, provider: LoginProvider) -> AuthResult<LoginAction> {
        if self.disallowed.contains(&provider) {
            return Err(AuthError::ProviderDisabled { provider });
        }
        if self.snapshot().is_logged_in {
            debug!(%provider, "Already logged in; refreshing user state");
            self.publish(AuthSnapshot::authenticating());
            let resolved = self.source.resolve_principal().await;
            self.settle(resolved);
            Ok(LoginAction::Refreshed)
        } else {
            Ok(LoginAction::Navigate(auth_endpoint(
                &self.settings.base_url,
                &format!("login/{}", provider),
            )))
        }
    }

    /// End the session: reset the context to the logged-out state and hand
    /// back the logout URL to navigate to.
    pub fn logout(&self) -> LoginAction {
        self.publish(AuthSnapshot::settled(ClientPrincipal::empty()));
        LoginAction::Navigate(auth_endpoint(&self.settings.base_url, "logout"))
    }

    /// Tear the context down: publish a final logged-out reset and stop any
    /// in-flight resolution from updating the context afterwards.
    pub fn unmount(&self) {
        self.publish(AuthSnapshot::settled(ClientPrincipal::empty()));
        self.mounted.store(false, Ordering::SeqCst);
        debug!("Auth provider unmounted");
    }

    fn settle(&self, resolved: AuthResult<ClientPrincipal>) {
        let snapshot = match resolved {
            Ok(user) => {
                info!(logged_in = user.is_logged_in(), "Authentication settled");
                AuthSnapshot::settled(user)
            }
            Err(err) => {
                warn!(error = %err, "Authentication failed; treating user as logged out");
                AuthSnapshot::failed(err.to_string())
            }
        };
        self.publish(snapshot);
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        if !self.mounted.load(Ordering::SeqCst) {
            debug!("Provider unmounted; suppressing context update");
            return;
        }
        let _ = self.tx.send(snapshot);
    }
}

impl Drop for AuthProvider {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

/// Read access to the authentication context.
///
/// Cheap to clone and hand down a subtree; every clone observes the same
/// provider. Readers never mutate the context.
#[derive(Debug, Clone)]
pub struct AuthHandle {
    rx: watch::Receiver<AuthSnapshot>,
}

impl AuthHandle {
    /// The current snapshot
    pub fn snapshot(&self) -> AuthSnapshot {
        self.rx.borrow().clone()
    }

    /// The current user (empty sentinel until resolved)
    pub fn user(&self) -> ClientPrincipal {
        self.rx.borrow().user.clone()
    }

    pub fn is_authenticating(&self) -> bool {
        self.rx.borrow().is_authenticating
    }

    pub fn is_logged_in(&self) -> bool {
        self.rx.borrow().is_logged_in
    }

    /// Wait for the next published snapshot. Returns `None` once the
    /// provider is gone and no further updates can arrive.
    pub async fn changed(&mut self) -> Option<AuthSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the state machine has settled and return that snapshot.
    ///
    /// If the provider goes away first, the last observed snapshot is
    /// returned as-is.
    pub async fn settled(&mut self) -> AuthSnapshot {
        loop {
            let snapshot = self.rx.borrow_and_update().clone();
            if !snapshot.is_authenticating {
                return snapshot;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}
