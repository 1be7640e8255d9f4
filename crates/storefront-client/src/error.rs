//! Error taxonomy for the storefront client.

use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by the storefront client.
///
/// The transient classes — [`Network`](ApiError::Network),
/// [`HeadersTooLarge`](ApiError::HeadersTooLarge) and
/// [`CsrfMismatch`](ApiError::CsrfMismatch) — are recovered locally up to
/// the retry bounds before they reach a caller; everything else propagates
/// immediately.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure before any HTTP status was received (the
    /// browser's "status 0": refused connection, timeout, DNS).
    #[error("network failure: {0}")]
    Network(String),

    /// Server rejected the request headers as too large (431).
    #[error("request headers too large (431)")]
    HeadersTooLarge,

    /// CSRF token mismatch (419).
    #[error("CSRF token mismatch (419)")]
    CsrfMismatch,

    /// Session expired or missing (401). Local session state has already
    /// been cleared when this surfaces.
    #[error("unauthenticated (401)")]
    Unauthorized,

    /// Validation failure (422), carried verbatim for display.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        /// Field name to messages, as sent by the backend.
        errors: HashMap<String, Vec<String>>,
    },

    /// Any other non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A success response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the cookie-prune-and-delay retry path applies.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::HeadersTooLarge)
    }
}
