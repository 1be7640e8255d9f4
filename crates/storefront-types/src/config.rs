//! Client configuration.
//!
//! Plain structs with `Default` impls; no config-file framework. The
//! defaults match a local development backend.

use serde::{Deserialize, Serialize};

/// Fixed keys for the locally persisted session state.
///
/// These names are part of the on-disk/session contract and must not drift
/// between releases, or existing sessions become unreadable.
pub mod storage_keys {
    /// Bearer token returned by login, when the backend issues one.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Serialized [`crate::User`] for session restore without a round-trip.
    pub const CURRENT_USER: &str = "current_user";
    /// Serialized [`crate::Cart`]; the cart never leaves the client.
    pub const CART: &str = "cart";
    /// Fallback copy of the CSRF token for recovery when the cookie is gone.
    pub const XSRF_FALLBACK: &str = "xsrf_fallback";
}

/// Top-level SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API origin, e.g. `http://127.0.0.1:8000`. Endpoint paths are joined
    /// onto this.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub retry: RetryConfig,
    pub cookies: CookiePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
            cookies: CookiePolicy::default(),
        }
    }
}

/// Retry policy for the resilient request client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts after the first for transport failures and 431 responses.
    pub transport_retries: u32,
    /// Delay before each transport retry, in milliseconds.
    pub transport_delay_ms: u64,
    /// Replays allowed after a CSRF mismatch. One refresh-and-replay is
    /// the contract with the backend; raising this only re-sends a token
    /// the server already rejected.
    pub csrf_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            transport_retries: 2,
            transport_delay_ms: 800,
            csrf_retries: 1,
        }
    }
}

/// Cookie governance thresholds and fixed cookie names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookiePolicy {
    /// Aggregate jar size above which non-essential cookies are cleared.
    pub max_total_bytes: usize,
    /// Single-value size above which compression is attempted.
    pub compress_threshold_bytes: usize,
    /// Name prefix of the per-navigation route-marker cookies.
    pub route_cookie_prefix: String,
    /// How many route-marker cookies survive a prune.
    pub route_cookie_keep: usize,
    /// Name of the CSRF token cookie.
    pub csrf_cookie: String,
    /// Name of the backend session cookie.
    pub session_cookie: String,
    /// Case-insensitive substrings marking a cookie as essential.
    pub essential_markers: Vec<String>,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            max_total_bytes: 3000,
            compress_threshold_bytes: 1000,
            route_cookie_prefix: "rt_".to_string(),
            route_cookie_keep: 2,
            csrf_cookie: "XSRF-TOKEN".to_string(),
            session_cookie: "storefront_session".to_string(),
            essential_markers: vec![
                "csrf".to_string(),
                "xsrf".to_string(),
                "token".to_string(),
                "auth".to_string(),
            ],
        }
    }
}

impl CookiePolicy {
    /// Whether a cookie must survive any cleanup pass.
    pub fn is_essential(&self, name: &str) -> bool {
        if name == self.csrf_cookie || name == self.session_cookie {
            return true;
        }
        let lower = name.to_lowercase();
        self.essential_markers.iter().any(|m| lower.contains(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essential_predicate() {
        let policy = CookiePolicy::default();

        assert!(policy.is_essential("XSRF-TOKEN"));
        assert!(policy.is_essential("storefront_session"));
        assert!(policy.is_essential("my_auth_state"));
        assert!(policy.is_essential("API_TOKEN_V2"));
        assert!(!policy.is_essential("tmp_3"));
        assert!(!policy.is_essential("rt_home"));
    }

    #[test]
    fn test_default_thresholds() {
        let config = ClientConfig::default();
        assert_eq!(config.cookies.max_total_bytes, 3000);
        assert_eq!(config.cookies.compress_threshold_bytes, 1000);
        assert_eq!(config.retry.transport_delay_ms, 800);
        assert_eq!(config.retry.csrf_retries, 1);
    }
}
