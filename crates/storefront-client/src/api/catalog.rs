//! Category and product endpoints.

use crate::client::StorefrontClient;
use crate::error::ApiError;
use serde::Serialize;
use storefront_types::{Category, Product};

/// Payload for creating or updating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price_cents: i64,
    pub category_id: i64,
    pub available: bool,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl StorefrontClient {
    // ----- categories -----

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json_or_default("/api/categories").await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.post_json("/api/categories", input).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.put_json(&format!("/api/categories/{id}"), input).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/categories/{id}")).await
    }

    // ----- products -----

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json_or_default("/api/products").await
    }

    pub async fn product(&self, id: i64) -> Result<Product, ApiError> {
        self.get_json(&format!("/api/products/{id}")).await
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        self.post_json("/api/products", input).await
    }

    pub async fn update_product(&self, id: i64, input: &ProductInput) -> Result<Product, ApiError> {
        self.put_json(&format!("/api/products/{id}"), input).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/products/{id}")).await
    }

    /// Flip a product's availability without sending the whole record.
    pub async fn toggle_availability(&self, id: i64) -> Result<Product, ApiError> {
        self.patch_json(&format!("/api/products/{id}/toggle-availability"))
            .await
    }

    // ----- storefront queries (degrade to empty on outage) -----

    pub async fn related_products(&self, id: i64) -> Result<Vec<Product>, ApiError> {
        self.get_json_or_default(&format!("/api/products/{id}/related"))
            .await
    }

    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.get_json_or_default(&format!("/api/products/search?q={encoded}"))
            .await
    }

    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json_or_default("/api/products/featured").await
    }
}
