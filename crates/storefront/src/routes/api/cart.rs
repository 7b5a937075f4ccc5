//! Cart JSON API.
//!
//! Read-only view of the cart for scripts that cannot parse HTML fragments.

use axum::Json;
use shopfront_cart::CartSnapshot;
use tracing::instrument;

use crate::middleware::UseCart;

/// Current cart as JSON.
#[instrument(skip(cart))]
pub async fn show(UseCart(cart): UseCart) -> Json<CartSnapshot> {
    Json(cart.snapshot())
}
