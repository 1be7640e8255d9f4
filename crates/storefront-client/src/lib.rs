#![doc = include_str!("../README.md")]

mod api;
mod client;
mod csrf;
mod error;

pub use api::{CategoryInput, PostInput, ProductInput};
pub use client::StorefrontClient;
pub use csrf::CsrfManager;
pub use error::ApiError;

pub use storefront_types::{ClientConfig, CookiePolicy, RetryConfig};
