//! Typed endpoint wrappers, one module per resource.
//!
//! Each wrapper is a thin method on [`StorefrontClient`](crate::StorefrontClient)
//! over the shared request helpers; the resilience policy lives entirely in
//! the client, not here.

mod auth;
mod blog;
mod cart;
mod catalog;
mod settings;

pub use blog::PostInput;
pub use catalog::{CategoryInput, ProductInput};
