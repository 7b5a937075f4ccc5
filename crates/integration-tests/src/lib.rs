//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart pages, fragments and the JSON API over HTTP
//! - `cart_persistence` - Saved cart survival across restarts
//!
//! Requests are sent straight into the router with `tower::ServiceExt`, so
//! no port is bound. Each [`TestApp`] writes its cart into its own temporary
//! directory.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use shopfront_cart::QuantityPolicy;
use shopfront_storefront::config::{CartConfig, StorefrontConfig};
use shopfront_storefront::routes;
use shopfront_storefront::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

/// Largest response body the helpers will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// Storefront configuration writing its cart into `dir`.
#[must_use]
pub fn test_config(dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        cart: CartConfig {
            dir: dir.to_path_buf(),
            ..CartConfig::default()
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A storefront router backed by a temporary cart directory.
pub struct TestApp {
    pub dir: TempDir,
    pub config: StorefrontConfig,
    pub router: Router,
}

impl TestApp {
    /// Start an app with default cart settings.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = test_config(dir.path());
        Self::from_parts(dir, config)
    }

    /// Start an app with the given quantity policy and checkout behaviour.
    #[must_use]
    pub fn with_settings(policy: QuantityPolicy, clear_on_checkout: bool) -> Self {
        let mut app = Self::new();
        app.config.cart.quantity_policy = policy;
        app.config.cart.clear_on_checkout = clear_on_checkout;
        app.restart()
    }

    fn from_parts(dir: TempDir, config: StorefrontConfig) -> Self {
        let router = routes::app(AppState::new(config.clone()));
        Self {
            dir,
            config,
            router,
        }
    }

    /// Drop the running app and start a new one over the same directory.
    #[must_use]
    pub fn restart(self) -> Self {
        let Self { dir, config, .. } = self;
        Self::from_parts(dir, config)
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which it never does for axum handlers.
    #[allow(clippy::expect_used)]
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Response<Body> {
        self.send(get(path)).await
    }

    /// `POST path` with a URL-encoded form body.
    pub async fn post_form(&self, path: &str, form: &str) -> Response<Body> {
        self.send(post_form(path, form)).await
    }

    /// `GET /api/cart` as JSON.
    pub async fn cart_json(&self) -> serde_json::Value {
        let response = self.get("/api/cart").await;
        assert_eq!(response.status(), StatusCode::OK);
        json(response).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a `GET` request.
///
/// # Panics
///
/// Panics if `path` is not a valid URI.
#[must_use]
#[allow(clippy::expect_used)]
pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("valid request")
}

/// Build a form `POST` request.
///
/// # Panics
///
/// Panics if `path` is not a valid URI.
#[must_use]
#[allow(clippy::expect_used)]
pub fn post_form(path: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .expect("valid request")
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
#[allow(clippy::expect_used)]
pub async fn text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
#[allow(clippy::expect_used)]
pub async fn json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&text(response).await).expect("json body")
}
