//! Cart provider middleware and extractor.
//!
//! `provide_cart` places the application's [`CartContext`] into request
//! extensions. [`UseCart`] takes it back out; a route mounted without the
//! provider is a wiring bug and fails with a logged 500 instead of silently
//! working against some other cart.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use shopfront_cart::CartContext;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware that provides the cart to every route below it.
pub async fn provide_cart(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state.cart().clone());
    next.run(request).await
}

/// Extractor for the cart provided by [`provide_cart`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(UseCart(cart): UseCart) -> String {
///     cart.snapshot().formatted_total
/// }
/// ```
pub struct UseCart(pub CartContext);

impl<S> FromRequestParts<S> for UseCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        CartContext::require(parts.extensions.get::<CartContext>())
            .map(Self)
            .map_err(|e| {
                tracing::error!(
                    path = %parts.uri.path(),
                    "UseCart used on a route without the provide_cart layer"
                );
                AppError::Cart(e)
            })
    }
}
