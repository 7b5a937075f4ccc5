//! JSON API handlers.

pub mod cart;
