//! Integration test harness for Amara Atelier.
//!
//! Tests drive the real storefront `Router` in-process with
//! `tower::ServiceExt::oneshot` - no sockets for the storefront itself, so
//! the suite runs without a deployed server. The session cookie is
//! propagated manually between requests, which is what makes multi-request
//! cart and checkout flows possible against the in-memory session store.
//!
//! The payment provider is the one true external collaborator; tests that
//! exercise intent creation point the client at a local stub server bound
//! to an ephemeral port.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use amara_core::CurrencyCode;
use amara_storefront::config::{PaymentConfig, StorefrontConfig};
use amara_storefront::services::orders::InMemoryOrderStore;
use amara_storefront::state::AppState;

/// Test publishable key (diagnostics report its prefix).
pub const PUBLISHABLE_KEY: &str = "pk_test_amara_51Hxyz";
/// Test secret key.
pub const SECRET_KEY: &str = "sk_test_amara_51Hxyz";
/// Test webhook signing secret, shared with the webhook tests.
pub const WEBHOOK_SECRET: &str = "whsec_test_4fJ8xQ2mPnL7vB9c";

/// A storefront app plus the session cookie of one simulated visitor.
pub struct TestContext {
    app: Router,
    cookie: Option<String>,
    /// The order store behind the app, for seeding and inspection.
    pub orders: Arc<InMemoryOrderStore>,
}

impl TestContext {
    /// Context with a provider base that refuses connections; fine for
    /// everything except intent creation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_api_base("http://127.0.0.1:9")
    }

    /// Context whose payment client targets the given provider base URL.
    #[must_use]
    pub fn with_api_base(api_base: &str) -> Self {
        let orders = Arc::new(InMemoryOrderStore::new());
        let state = AppState::with_order_store(test_config(api_base), orders.clone())
            .expect("app state should build");
        Self {
            app: amara_storefront::app(state),
            cookie: None,
            orders,
        }
    }

    /// GET a path, returning status and parsed JSON body.
    pub async fn get(&mut self, path: &str) -> (StatusCode, Value) {
        let request = self.request("GET", path).body(Body::empty());
        self.send(request.expect("request should build")).await
    }

    /// POST a JSON body.
    pub async fn post(&mut self, path: &str, body: &Value) -> (StatusCode, Value) {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()));
        self.send(request.expect("request should build")).await
    }

    /// POST with no body (transition endpoints).
    pub async fn post_empty(&mut self, path: &str) -> (StatusCode, Value) {
        let request = self.request("POST", path).body(Body::empty());
        self.send(request.expect("request should build")).await
    }

    /// POST raw bytes with extra headers (the webhook path, where the
    /// signature covers the exact byte stream).
    pub async fn post_raw(
        &mut self,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> (StatusCode, Value) {
        let mut request = self.request("POST", path);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(request.body(Body::from(body)).expect("request should build"))
            .await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie should be ascii");
            let pair = raw.split(';').next().expect("cookie should have a value");
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config(api_base: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kX9mP2vQ7wR4tY8uJ3nL6bC1dF5gH0sAkX9mP2vQ7wR4tY8u"),
        payment: PaymentConfig {
            api_base: api_base.to_string(),
            publishable_key: PUBLISHABLE_KEY.to_string(),
            secret_key: SecretString::from(SECRET_KEY),
            webhook_secret: SecretString::from(WEBHOOK_SECRET),
            currency: CurrencyCode::USD,
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

static INTENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Spawn a stub provider that creates intents with unique ids.
///
/// Returns the base URL to use as `PAYMENT_API_BASE`.
pub async fn spawn_provider_stub() -> String {
    let app = Router::new().route(
        "/v1/payment_intents",
        post(|| async {
            let n = INTENT_COUNTER.fetch_add(1, Ordering::Relaxed);
            Json(json!({
                "id": format!("pi_stub_{n}"),
                "client_secret": format!("pi_stub_{n}_secret_abc"),
                "status": "requires_payment_method",
            }))
        }),
    );
    serve_stub(app).await
}

/// Spawn a stub provider that rejects every intent with a card-style error.
pub async fn spawn_rejecting_provider_stub() -> String {
    let app = Router::new().route(
        "/v1/payment_intents",
        post(|| async {
            (
                StatusCode::PAYMENT_REQUIRED,
                Json(json!({
                    "error": { "message": "Your card was declined.", "type": "card_error" }
                })),
            )
        }),
    );
    serve_stub(app).await
}

async fn serve_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub should bind an ephemeral port");
    let addr = listener.local_addr().expect("stub should have an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub should serve");
    });
    format!("http://{addr}")
}
