//! # Storefront Types
//!
//! Core types, models and configuration for the storefront SDK.
//!
//! This crate sits at the bottom of the dependency graph:
//!
//! ```text
//!          storefront-types (this crate)
//!                  │
//!          ┌───────┴────────┐
//!          ▼                ▼
//!   storefront-core  storefront-client
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for API payloads and the session file
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod config;
pub mod models;

pub use config::{ClientConfig, CookiePolicy, RetryConfig};
pub use models::{
    BlogPost, Cart, CartItem, Category, Credentials, Product, StoreSettings, User,
};
