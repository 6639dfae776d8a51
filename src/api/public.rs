//! HTTP implementation of the public surface.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::PublicBackend;
use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::models::{CategoryPublic, ContentImage, ContentPublic, HeadingPublic, MenuNode, PageOut, SearchHit};

/// Public endpoints over the shared gateway.
#[derive(Debug, Clone)]
pub struct HttpPublicApi {
    gateway: Arc<ApiGateway>,
}

impl HttpPublicApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl PublicBackend for HttpPublicApi {
    async fn categories(&self) -> Result<Vec<CategoryPublic>> {
        self.gateway.get_json("/categories").await
    }

    async fn headings_l1(&self, category_slug: &str) -> Result<Vec<HeadingPublic>> {
        self.gateway
            .get_json(&format!("/categories/{category_slug}/headings"))
            .await
    }

    async fn headings_l2(&self, category_slug: &str, h1_slug: &str) -> Result<Vec<HeadingPublic>> {
        self.gateway
            .get_json(&format!("/categories/{category_slug}/{h1_slug}/headings"))
            .await
    }

    async fn page(&self, category_slug: &str, h1_slug: &str, h2_slug: &str) -> Result<PageOut> {
        self.gateway
            .get_json(&format!("/page/{category_slug}/{h1_slug}/{h2_slug}"))
            .await
    }

    async fn contents_of(&self, heading_id: &str) -> Result<Vec<ContentPublic>> {
        self.gateway
            .get_json_query("/public/contents", &[("heading_id", heading_id.to_string())])
            .await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.gateway
            .get_json_query(
                "/search",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    async fn menu(&self) -> Result<Vec<MenuNode>> {
        self.gateway.get_json("/menu").await
    }

    async fn content_images(&self, content_id: &str) -> Result<Vec<ContentImage>> {
        self.gateway
            .get_json(&format!("/contents/{content_id}/images"))
            .await
    }
}
