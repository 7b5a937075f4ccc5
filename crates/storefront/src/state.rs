//! Application state shared across handlers.

use std::sync::Arc;

use shopfront_cart::{CartContext, CartPersistence, CartStore, FileStorage};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the single cart
/// store for the process. Handlers reach the cart through the
/// [`UseCart`](crate::middleware::UseCart) extractor, not through this state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartContext,
}

impl AppState {
    /// Create application state with a file-backed cart.
    ///
    /// The saved cart is read exactly once, here, before any request can
    /// see it.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storage = FileStorage::new(config.cart.dir.clone());
        let persistence = CartPersistence::new(storage, config.cart.key.clone());
        let cart = CartContext::new(CartStore::open(persistence, config.cart.settings()));
        Self::with_cart(config, cart)
    }

    /// Create application state around an existing cart context.
    #[must_use]
    pub fn with_cart(config: StorefrontConfig, cart: CartContext) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, cart }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the cart context owned by this application.
    #[must_use]
    pub fn cart(&self) -> &CartContext {
        &self.inner.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{CartItem, Price};

    use super::*;
    use crate::config::CartConfig;

    fn config(dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
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

    #[test]
    fn test_new_loads_saved_cart_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();

        let state = AppState::new(config(dir.path()));
        state
            .cart()
            .dispatch()
            .add_to_cart(CartItem::new("p1", "Shoe", Price::from_cents(4999), 2))
            .unwrap();
        assert!(dir.path().join("shopfront_cart.json").exists());

        let reopened = AppState::new(config(dir.path()));
        assert_eq!(reopened.cart().item_count(), 2);
        assert_eq!(reopened.config().cart.key, "shopfront_cart");
    }

    #[test]
    fn test_clones_share_one_cart() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(dir.path()));
        let clone = state.clone();
        assert_eq!(state.cart().dispatch(), clone.cart().dispatch());
    }
}
