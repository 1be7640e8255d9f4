//! CSRF token lifecycle.
//!
//! The token lives in a cookie the backend sets from a bootstrap endpoint.
//! This manager caches a fallback copy in the session store so a lost
//! cookie (cleanup, jar reset) does not force a re-login, and collapses
//! concurrent refresh attempts into one bootstrap request.

use crate::error::ApiError;
use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use storefront_core::{CookieEntry, CookieJar, SessionStore};
use storefront_types::config::storage_keys;

/// `Uninitialized → Initializing → Ready`; refresh goes back through
/// `Initializing`, and any bootstrap failure lands in `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
}

pub struct CsrfManager {
    http: reqwest::Client,
    base_url: String,
    csrf_cookie: String,
    jar: Arc<Mutex<CookieJar>>,
    store: Arc<dyn SessionStore>,
    state: Mutex<LifecycleState>,
    refresh_in_flight: AtomicBool,
}

impl CsrfManager {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: String,
        csrf_cookie: String,
        jar: Arc<Mutex<CookieJar>>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            http,
            base_url,
            csrf_cookie,
            jar,
            store,
            state: Mutex::new(LifecycleState::Uninitialized),
            refresh_in_flight: AtomicBool::new(false),
        }
    }

    /// Current token: cookie first, then the persisted fallback copy. The
    /// backend sets the cookie percent-encoded, so the value is decoded
    /// before use. A token recovered from the fallback is written back
    /// into the jar so the next request carries it as a cookie again.
    pub fn token(&self) -> Option<String> {
        let mut jar = self.jar.lock();
        if let Some(value) = jar.get_value(&self.csrf_cookie) {
            return Some(decode_token(value));
        }

        let fallback = self.store.get(storage_keys::XSRF_FALLBACK)?;
        tracing::debug!("csrf cookie missing, recovering from fallback store");
        let mut entry = CookieEntry::new(self.csrf_cookie.clone(), fallback.clone());
        entry.path = Some("/".to_string());
        jar.set(entry);
        Some(fallback)
    }

    /// Idempotent bootstrap. `Ready` resolves immediately without a
    /// network call; otherwise the primary endpoint is hit and, on
    /// failure, one alternate before the error surfaces.
    pub async fn initialize(&self) -> Result<(), ApiError> {
        {
            let mut state = self.state.lock();
            if *state == LifecycleState::Ready {
                return Ok(());
            }
            *state = LifecycleState::Initializing;
        }

        let primary = format!("{}/sanctum/csrf-cookie", self.base_url);
        let result = match self.bootstrap(&primary).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let alternate = format!("{}/api/csrf-cookie", self.base_url);
                tracing::warn!(error = %e, "csrf bootstrap failed, trying alternate endpoint");
                self.bootstrap(&alternate).await
            }
        };

        match result {
            Ok(()) => {
                if let Some(token) = self.jar.lock().get_value(&self.csrf_cookie) {
                    self.store
                        .put(storage_keys::XSRF_FALLBACK, &decode_token(token));
                }
                *self.state.lock() = LifecycleState::Ready;
                Ok(())
            }
            Err(e) => {
                *self.state.lock() = LifecycleState::Uninitialized;
                Err(e)
            }
        }
    }

    /// Force a new token. Overlapping calls are no-ops while a refresh is
    /// in flight, so N concurrent callers produce one bootstrap request.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        if self
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("csrf refresh already in flight, skipping");
            return Ok(());
        }

        *self.state.lock() = LifecycleState::Uninitialized;
        let result = self.initialize().await;
        self.refresh_in_flight.store(false, Ordering::SeqCst);
        result
    }

    /// Drop all token state. Used on logout and session expiry.
    pub fn reset(&self) {
        self.jar.lock().remove(&self.csrf_cookie);
        self.store.remove(storage_keys::XSRF_FALLBACK);
        *self.state.lock() = LifecycleState::Uninitialized;
    }

    async fn bootstrap(&self, url: &str) -> Result<(), ApiError> {
        let mut request = self.http.get(url);
        if let Some(cookie_header) = self.jar.lock().request_header() {
            request = request.header(reqwest::header::COOKIE, cookie_header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        {
            let mut jar = self.jar.lock();
            for header in response.headers().get_all(reqwest::header::SET_COOKIE) {
                if let Ok(raw) = header.to_str() {
                    jar.apply_set_cookie(raw);
                }
            }
        }

        if status.is_success() {
            tracing::debug!(%url, "csrf token bootstrapped");
            Ok(())
        } else {
            Err(ApiError::Server {
                status: status.as_u16(),
                message: "csrf bootstrap rejected".to_string(),
            })
        }
    }
}

fn decode_token(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::MemorySessionStore;

    fn manager_with(store: Arc<MemorySessionStore>, jar: Arc<Mutex<CookieJar>>) -> CsrfManager {
        CsrfManager::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1".to_string(),
            "XSRF-TOKEN".to_string(),
            jar,
            store,
        )
    }

    #[test]
    fn test_token_prefers_cookie() {
        let store = Arc::new(MemorySessionStore::new());
        store.put(storage_keys::XSRF_FALLBACK, "stale");
        let jar = Arc::new(Mutex::new(CookieJar::new()));
        jar.lock().set(CookieEntry::new("XSRF-TOKEN", "live"));

        let manager = manager_with(store, jar);
        assert_eq!(manager.token().as_deref(), Some("live"));
    }

    #[test]
    fn test_token_recovered_from_fallback_rewrites_cookie() {
        let store = Arc::new(MemorySessionStore::new());
        store.put(storage_keys::XSRF_FALLBACK, "recovered");
        let jar = Arc::new(Mutex::new(CookieJar::new()));

        let manager = manager_with(store, jar.clone());
        assert_eq!(manager.token().as_deref(), Some("recovered"));
        assert_eq!(jar.lock().get_value("XSRF-TOKEN"), Some("recovered"));
    }

    #[test]
    fn test_token_is_percent_decoded() {
        let store = Arc::new(MemorySessionStore::new());
        let jar = Arc::new(Mutex::new(CookieJar::new()));
        jar.lock()
            .set(CookieEntry::new("XSRF-TOKEN", "eyJpdiI6abc%3D"));

        let manager = manager_with(store, jar);
        assert_eq!(manager.token().as_deref(), Some("eyJpdiI6abc="));
    }

    #[test]
    fn test_token_absent_everywhere() {
        let store = Arc::new(MemorySessionStore::new());
        let jar = Arc::new(Mutex::new(CookieJar::new()));
        let manager = manager_with(store, jar);
        assert!(manager.token().is_none());
    }

    #[test]
    fn test_reset_clears_cookie_and_fallback() {
        let store = Arc::new(MemorySessionStore::new());
        store.put(storage_keys::XSRF_FALLBACK, "t");
        let jar = Arc::new(Mutex::new(CookieJar::new()));
        jar.lock().set(CookieEntry::new("XSRF-TOKEN", "t"));

        let manager = manager_with(store.clone(), jar.clone());
        manager.reset();

        assert!(jar.lock().get_value("XSRF-TOKEN").is_none());
        assert!(store.get(storage_keys::XSRF_FALLBACK).is_none());
    }
}
