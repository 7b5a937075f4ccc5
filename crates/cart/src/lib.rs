//! Shopfront Cart - the cart store and its persistence contract.
//!
//! # Architecture
//!
//! ```text
//! CartContext ──► CartDispatch ──► CartStore::apply ──► reduce(items, action)
//!                                        │
//!                                        └──► CartPersistence ──► CartStorage
//!                                                                 (file / memory)
//! ```
//!
//! The store is constructed once by the owning root, seeded from storage,
//! and handed down as a [`CartContext`]. Every mutation is persisted in full
//! after it is applied; storage failures are logged and never undo the
//! in-memory change.
//!
//! # Modules
//!
//! - [`reducer`] - Pure cart actions and the reduce function
//! - [`policy`] - Quantity and checkout policies
//! - [`codec`] - Versioned JSON envelope and defensive decoder
//! - [`storage`] - Key/value storage backends
//! - [`persistence`] - Load-once / save-after-every-change adapter
//! - [`store`] - The cart store
//! - [`context`] - Consumer accessor and stable dispatch handle
//! - [`checkout`] - Checkout summary and price drift reporting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod codec;
pub mod context;
pub mod error;
pub mod persistence;
pub mod policy;
pub mod reducer;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutSummary, PriceDrift};
pub use context::{CartContext, CartDispatch, CartSnapshot};
pub use error::{CartError, Result, StorageError};
pub use persistence::CartPersistence;
pub use policy::{CartSettings, QuantityPolicy};
pub use reducer::{CartAction, Outcome};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::CartStore;
