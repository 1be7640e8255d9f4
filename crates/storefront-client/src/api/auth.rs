//! Authentication endpoints and the locally cached session.

use crate::client::StorefrontClient;
use crate::error::ApiError;
use serde::Deserialize;
use storefront_types::config::storage_keys;
use storefront_types::{Credentials, User};

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
    /// Present when the backend issues a bearer token alongside the
    /// session cookie.
    #[serde(default)]
    token: Option<String>,
}

impl StorefrontClient {
    /// Log in and persist the session locally (user snapshot plus access
    /// token when one is issued). Bootstraps the CSRF token first, since
    /// login is the first mutating call of any session.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.csrf().initialize().await?;

        let response: LoginResponse = self.post_json("/api/login", credentials).await?;
        if let Some(token) = &response.token {
            self.store.put(storage_keys::ACCESS_TOKEN, token);
        }
        match serde_json::to_string(&response.user) {
            Ok(serialized) => self.store.put(storage_keys::CURRENT_USER, &serialized),
            Err(e) => tracing::warn!(error = %e, "failed to cache current user"),
        }
        Ok(response.user)
    }

    /// Log out and drop every piece of local session state, including the
    /// CSRF token.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.post_empty("/api/logout").await;
        self.store.remove(storage_keys::ACCESS_TOKEN);
        self.store.remove(storage_keys::CURRENT_USER);
        self.csrf().reset();
        result
    }

    /// Fetch the authenticated user from the backend.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json("/api/user").await
    }

    /// Locally cached user snapshot, if a session was persisted.
    pub fn cached_user(&self) -> Option<User> {
        let serialized = self.store.get(storage_keys::CURRENT_USER)?;
        serde_json::from_str(&serialized).ok()
    }
}
