//! Integration test helpers
//!
//! Spins up a real HTTP server standing in for the identity platform, with
//! a scriptable `/.auth/me` route.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::{Arc, LazyLock, Mutex};
use tokio::net::TcpListener;

use rolegate_auth::{AuthProvider, IdentityClient, IdentityClientConfig, PrincipalSource};
use rolegate_core::AuthSettings;

// Make sure tracing is only initialized once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// What the scripted identity endpoint returns next
#[derive(Debug, Clone)]
pub enum MeScript {
    /// 200 with the given client principal payload
    Principal(serde_json::Value),
    /// 200 with `{"clientPrincipal": null}`
    NullPrincipal,
    /// The given failure status with an empty body
    Status(u16),
    /// 200 with a body that is not the expected envelope
    Garbage(&'static str),
}

/// A running identity test server
pub struct TestApp {
    pub address: String,
    script: Arc<Mutex<MeScript>>,
}

impl TestApp {
    /// Change what `/.auth/me` returns from now on
    pub fn set_script(&self, script: MeScript) {
        *self.script.lock().unwrap() = script;
    }

    /// An identity client pointed at this server
    pub fn identity_client(&self) -> IdentityClient {
        IdentityClient::new(IdentityClientConfig::new(self.address.clone()).with_timeout(5))
            .expect("Failed to build identity client")
    }

    /// Auth settings pointed at this server
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            base_url: self.address.clone(),
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    /// A mounted provider resolved against this server
    pub async fn mounted_provider(&self) -> Arc<AuthProvider> {
        let client: Arc<dyn PrincipalSource> = Arc::new(self.identity_client());
        let provider = AuthProvider::with_source(self.auth_settings(), client);
        provider.mount().await;
        provider
    }
}

async fn me_endpoint(State(script): State<Arc<Mutex<MeScript>>>) -> Response {
    let script = script.lock().unwrap().clone();
    match script {
        MeScript::Principal(principal) => {
            Json(json!({ "clientPrincipal": principal })).into_response()
        }
        MeScript::NullPrincipal => Json(json!({ "clientPrincipal": null })).into_response(),
        MeScript::Status(code) => StatusCode::from_u16(code)
            .expect("Invalid scripted status code")
            .into_response(),
        MeScript::Garbage(body) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
    }
}

/// Spawn the identity test server on an ephemeral port
pub async fn spawn_app(initial: MeScript) -> TestApp {
    LazyLock::force(&TRACING);

    let script = Arc::new(Mutex::new(initial));
    let app = Router::new()
        .route("/.auth/me", get(me_endpoint))
        .with_state(script.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, script }
}
