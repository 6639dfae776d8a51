//! HTTP implementation of the admin surface.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::AdminBackend;
use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::models::{
    AdminCreate, AdminUser, Category, CategoryCreate, CategoryUpdate, Content, ContentCreate,
    ContentImage, ContentImageCreate, ContentImageUpdate, ContentUpdate, HeadingCreate,
    HeadingFilter, HeadingUpdate, Heading, ImageUpload, PasswordChange, TokenOut,
};

/// Admin endpoints over the shared gateway.
#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    gateway: Arc<ApiGateway>,
}

impl HttpAdminApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AdminBackend for HttpAdminApi {
    async fn login(&self, username: &str, password: &str) -> Result<TokenOut> {
        // OAuth2 password form; no auth header on the login call itself.
        self.gateway
            .post_form_unauthenticated(
                "/admin/login",
                &[("username", username), ("password", password)],
            )
            .await
    }

    async fn me(&self) -> Result<AdminUser> {
        self.gateway.get_json("/admin/me").await
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>> {
        self.gateway.get_json("/admin/users").await
    }

    async fn create_admin(&self, payload: &AdminCreate) -> Result<AdminUser> {
        self.gateway.post_json("/admin/users", payload).await
    }

    async fn delete_admin(&self, id: &str) -> Result<()> {
        self.gateway.delete(&format!("/admin/users/{id}")).await
    }

    async fn change_password(&self, id: &str, password: &str) -> Result<()> {
        let payload = PasswordChange {
            password: password.to_string(),
        };
        self.gateway
            .patch_json(&format!("/admin/users/{id}/password"), &payload)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.gateway.get_json("/admin/categories").await
    }

    async fn create_category(&self, payload: &CategoryCreate) -> Result<Category> {
        self.gateway.post_json("/admin/categories", payload).await
    }

    async fn update_category(&self, id: &str, payload: &CategoryUpdate) -> Result<Category> {
        self.gateway
            .put_json(&format!("/admin/categories/{id}"), payload)
            .await
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.gateway.delete(&format!("/admin/categories/{id}")).await
    }

    async fn list_headings(&self, filter: &HeadingFilter) -> Result<Vec<Heading>> {
        self.gateway
            .get_json_query("/admin/headings", &filter.query())
            .await
    }

    async fn create_heading(&self, payload: &HeadingCreate) -> Result<Heading> {
        self.gateway.post_json("/admin/headings", payload).await
    }

    async fn update_heading(&self, id: &str, payload: &HeadingUpdate) -> Result<Heading> {
        self.gateway
            .put_json(&format!("/admin/headings/{id}"), payload)
            .await
    }

    async fn delete_heading(&self, id: &str) -> Result<()> {
        self.gateway.delete(&format!("/admin/headings/{id}")).await
    }

    async fn list_contents(&self, heading_id: Option<&str>) -> Result<Vec<Content>> {
        match heading_id {
            Some(id) => {
                self.gateway
                    .get_json_query("/admin/contents", &[("heading_id", id.to_string())])
                    .await
            }
            None => self.gateway.get_json("/admin/contents").await,
        }
    }

    async fn get_content(&self, id: &str) -> Result<Content> {
        self.gateway.get_json(&format!("/admin/contents/{id}")).await
    }

    async fn create_content(&self, payload: &ContentCreate) -> Result<Content> {
        self.gateway.post_json("/admin/contents", payload).await
    }

    async fn update_content(&self, id: &str, payload: &ContentUpdate) -> Result<Content> {
        self.gateway
            .put_json(&format!("/admin/contents/{id}"), payload)
            .await
    }

    async fn delete_content(&self, id: &str) -> Result<()> {
        self.gateway.delete(&format!("/admin/contents/{id}")).await
    }

    async fn list_images(&self, content_id: Option<&str>) -> Result<Vec<ContentImage>> {
        match content_id {
            Some(id) => {
                self.gateway
                    .get_json_query("/admin/content-images", &[("content_id", id.to_string())])
                    .await
            }
            None => self.gateway.get_json("/admin/content-images").await,
        }
    }

    async fn create_image(&self, payload: &ContentImageCreate) -> Result<ContentImage> {
        self.gateway.post_json("/admin/content-images", payload).await
    }

    async fn update_image(&self, id: &str, payload: &ContentImageUpdate) -> Result<ContentImage> {
        self.gateway
            .put_json(&format!("/admin/content-images/{id}"), payload)
            .await
    }

    async fn delete_image(&self, id: &str) -> Result<()> {
        self.gateway
            .delete(&format!("/admin/content-images/{id}"))
            .await
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<ContentImage> {
        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("content_id", upload.content_id);
        if let Some(alt) = upload.alt {
            form = form.text("alt", alt);
        }
        if let Some(sort_order) = upload.sort_order {
            form = form.text("sort_order", sort_order.to_string());
        }
        if let Some(width) = upload.width {
            form = form.text("width", width.to_string());
        }
        if let Some(height) = upload.height {
            form = form.text("height", height.to_string());
        }

        self.gateway
            .post_multipart("/admin/content-images/upload", form)
            .await
    }
}
