//! Store settings endpoints.

use crate::client::StorefrontClient;
use crate::error::ApiError;
use storefront_types::StoreSettings;

impl StorefrontClient {
    /// Current store settings; degrades to defaults if the backend is
    /// unreachable so the storefront can still render.
    pub async fn settings(&self) -> Result<StoreSettings, ApiError> {
        self.get_json_or_default("/api/settings").await
    }

    /// Persist settings. Write path: errors always propagate.
    pub async fn update_settings(
        &self,
        settings: &StoreSettings,
    ) -> Result<StoreSettings, ApiError> {
        self.put_json("/api/settings", settings).await
    }
}
