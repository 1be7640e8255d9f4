//! Blog endpoints.

use crate::client::StorefrontClient;
use crate::error::ApiError;
use serde::Serialize;
use storefront_types::BlogPost;

/// Payload for creating or updating a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

impl StorefrontClient {
    pub async fn posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get_json_or_default("/api/posts").await
    }

    pub async fn post(&self, id: i64) -> Result<BlogPost, ApiError> {
        self.get_json(&format!("/api/posts/{id}")).await
    }

    pub async fn create_post(&self, input: &PostInput) -> Result<BlogPost, ApiError> {
        self.post_json("/api/posts", input).await
    }

    pub async fn update_post(&self, id: i64, input: &PostInput) -> Result<BlogPost, ApiError> {
        self.put_json(&format!("/api/posts/{id}"), input).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/posts/{id}")).await
    }
}
