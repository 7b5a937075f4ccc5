//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Cart provider (place the cart in request scope for `UseCart`)

pub mod cart;
pub mod request_id;

pub use cart::{UseCart, provide_cart};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
