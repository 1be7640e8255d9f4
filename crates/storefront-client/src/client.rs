//! The resilient request client.
//!
//! One retry loop serves every endpoint wrapper: requests go out with the
//! jar's cookies and, for mutating verbs, the CSRF headers; failures are
//! classified and either recovered locally (419 via token refresh, 431 and
//! transport failures via cookie pruning plus a delayed replay) or
//! propagated. Retries are strictly sequential.

use crate::csrf::CsrfManager;
use crate::error::ApiError;
use parking_lot::Mutex;
use reqwest::{header, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{CookieGovernor, CookieJar, SessionStore};
use storefront_types::config::storage_keys;
use storefront_types::ClientConfig;

/// Storefront API client.
///
/// All collaborators are owned here and constructor-injected — there is no
/// global state. Cloning is channel-cheap via the shared jar and store.
pub struct StorefrontClient {
    http: reqwest::Client,
    config: ClientConfig,
    jar: Arc<Mutex<CookieJar>>,
    governor: CookieGovernor,
    csrf: CsrfManager,
    pub(crate) store: Arc<dyn SessionStore>,
}

impl StorefrontClient {
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let jar = Arc::new(Mutex::new(CookieJar::new()));
        let csrf = CsrfManager::new(
            http.clone(),
            config.base_url.clone(),
            config.cookies.csrf_cookie.clone(),
            jar.clone(),
            store.clone(),
        );
        let governor = CookieGovernor::new(config.cookies.clone());

        Ok(Self {
            http,
            config,
            jar,
            governor,
            csrf,
            store,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token lifecycle manager, for explicit bootstrap or refresh.
    pub fn csrf(&self) -> &CsrfManager {
        &self.csrf
    }

    /// Run `f` against the cookie jar. Lock scope is the closure only.
    pub fn with_cookies<R>(&self, f: impl FnOnce(&mut CookieJar) -> R) -> R {
        f(&mut self.jar.lock())
    }

    /// Run the governor's full maintenance pass (compress, then prune,
    /// then cleanup) outside of any failure. Useful on a periodic timer.
    pub fn groom_cookies(&self) {
        let mut jar = self.jar.lock();
        self.governor.compress_large(&mut jar);
        self.governor
            .prune_route_cookies(&mut jar, self.config.cookies.route_cookie_keep);
        self.governor.cleanup(&mut jar);
    }

    // ----- request helpers used by the api modules -----

    pub(crate) async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(Method::GET, path, None).await?;
        decode_body(response).await
    }

    /// Read that degrades to `R::default()` once transport retries are
    /// exhausted, so list screens keep rendering through outages. Every
    /// other error still propagates.
    pub(crate) async fn get_json_or_default<R>(&self, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Default,
    {
        match self.get_json(path).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_transport() => {
                tracing::warn!(path, error = %e, "read degraded to empty payload");
                Ok(R::default())
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        decode_body(response).await
    }

    pub(crate) async fn put_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let response = self.execute(Method::PUT, path, Some(body)).await?;
        decode_body(response).await
    }

    pub(crate) async fn patch_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(Method::PATCH, path, None).await?;
        decode_body(response).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::POST, path, None).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }

    // ----- the retry loop -----

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        let mut transport_attempts = 0u32;
        let mut csrf_attempts = 0u32;

        loop {
            match self.attempt(&method, &url, body.as_ref()).await {
                Ok(response) => return Ok(response),
                Err(ApiError::CsrfMismatch)
                    if csrf_attempts < self.config.retry.csrf_retries =>
                {
                    // Refresh and replay; a 419 past the budget propagates.
                    csrf_attempts += 1;
                    tracing::warn!(path, "419 received, refreshing CSRF token and replaying");
                    self.csrf.refresh().await?;
                }
                Err(e)
                    if e.is_transport()
                        && transport_attempts < self.config.retry.transport_retries =>
                {
                    transport_attempts += 1;
                    let pruned = {
                        let mut jar = self.jar.lock();
                        let pruned = self
                            .governor
                            .prune_route_cookies(&mut jar, self.config.cookies.route_cookie_keep);
                        pruned + self.governor.cleanup(&mut jar)
                    };
                    tracing::warn!(
                        path,
                        attempt = transport_attempts,
                        pruned,
                        error = %e,
                        "transport failure, retrying after delay"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry.transport_delay_ms))
                        .await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let mut request = self.http.request(method.clone(), url);

        if let Some(cookie_header) = self.jar.lock().request_header() {
            request = request.header(header::COOKIE, cookie_header);
        }
        if is_mutating(method) {
            request = request.header("X-Requested-With", "XMLHttpRequest");
            if let Some(token) = self.csrf.token() {
                request = request.header("X-XSRF-TOKEN", token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        self.capture_cookies(&response);
        self.classify(response).await
    }

    fn capture_cookies(&self, response: &Response) {
        let mut jar = self.jar.lock();
        for header in response.headers().get_all(header::SET_COOKIE) {
            if let Ok(raw) = header.to_str() {
                jar.apply_set_cookie(raw);
            }
        }
    }

    async fn classify(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            419 => Err(ApiError::CsrfMismatch),
            431 => Err(ApiError::HeadersTooLarge),
            401 => {
                // The session is gone; local copies must not outlive it.
                tracing::warn!("401 received, clearing local session state");
                self.store.remove(storage_keys::ACCESS_TOKEN);
                self.store.remove(storage_keys::CURRENT_USER);
                Err(ApiError::Unauthorized)
            }
            422 => Err(parse_validation(response).await),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn is_mutating(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

async fn decode_body<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

async fn parse_validation(response: Response) -> ApiError {
    #[derive(serde::Deserialize)]
    struct ValidationBody {
        #[serde(default)]
        message: String,
        #[serde(default)]
        errors: HashMap<String, Vec<String>>,
    }

    debug_assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    match response.json::<ValidationBody>().await {
        Ok(body) => ApiError::Validation {
            message: body.message,
            errors: body.errors,
        },
        Err(e) => ApiError::Validation {
            message: format!("unparseable validation response: {e}"),
            errors: HashMap::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CookieEntry, MemorySessionStore};

    #[test]
    fn test_groom_cookies_runs_all_passes() {
        let client = StorefrontClient::new(
            ClientConfig::default(),
            Arc::new(MemorySessionStore::new()),
        )
        .unwrap();

        client.with_cookies(|jar| {
            jar.set(CookieEntry::new("big_blob", "abc ".repeat(500)));
            for i in 0..5 {
                jar.set(CookieEntry::new(format!("rt_{i}"), format!("{i:03}")));
            }
        });

        client.groom_cookies();

        client.with_cookies(|jar| {
            let big = jar.get_value("big_blob").unwrap();
            assert!(big.len() < 2000, "oversized value compressed");
            let routes = jar.iter().filter(|e| e.name.starts_with("rt_")).count();
            assert_eq!(routes, 2);
        });
    }

    #[test]
    fn test_mutating_verbs() {
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::HEAD));
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::PUT));
        assert!(is_mutating(&Method::PATCH));
        assert!(is_mutating(&Method::DELETE));
    }
}
