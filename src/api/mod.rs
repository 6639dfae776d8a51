//! Endpoint wrappers for the documentation API.
//!
//! The remote API is an external collaborator, so it is specified here as a
//! pair of traits at the interface boundary:
//! - [`AdminBackend`]: the authenticated authoring surface
//! - [`PublicBackend`]: the read-only public surface
//!
//! `HttpAdminApi` / `HttpPublicApi` implement them over [`ApiGateway`];
//! tests drive the console and reader against in-memory fakes instead.

mod admin;
mod public;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AdminCreate, AdminUser, Category, CategoryCreate, CategoryPublic, CategoryUpdate, Content,
    ContentCreate, ContentImage, ContentImageCreate, ContentImageUpdate, ContentPublic,
    ContentUpdate, HeadingCreate, HeadingFilter, HeadingUpdate, Heading, HeadingPublic,
    ImageUpload, MenuNode, PageOut, SearchHit, TokenOut,
};

pub use admin::HttpAdminApi;
pub use public::HttpPublicApi;

/// Authenticated admin surface of the documentation API.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    // Session
    async fn login(&self, username: &str, password: &str) -> Result<TokenOut>;
    async fn me(&self) -> Result<AdminUser>;

    // Admin users
    async fn list_admins(&self) -> Result<Vec<AdminUser>>;
    async fn create_admin(&self, payload: &AdminCreate) -> Result<AdminUser>;
    async fn delete_admin(&self, id: &str) -> Result<()>;
    async fn change_password(&self, id: &str, password: &str) -> Result<()>;

    // Categories
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, payload: &CategoryCreate) -> Result<Category>;
    async fn update_category(&self, id: &str, payload: &CategoryUpdate) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<()>;

    // Headings
    async fn list_headings(&self, filter: &HeadingFilter) -> Result<Vec<Heading>>;
    async fn create_heading(&self, payload: &HeadingCreate) -> Result<Heading>;
    async fn update_heading(&self, id: &str, payload: &HeadingUpdate) -> Result<Heading>;
    async fn delete_heading(&self, id: &str) -> Result<()>;

    // Contents
    async fn list_contents(&self, heading_id: Option<&str>) -> Result<Vec<Content>>;
    async fn get_content(&self, id: &str) -> Result<Content>;
    async fn create_content(&self, payload: &ContentCreate) -> Result<Content>;
    async fn update_content(&self, id: &str, payload: &ContentUpdate) -> Result<Content>;
    async fn delete_content(&self, id: &str) -> Result<()>;

    // Content images
    async fn list_images(&self, content_id: Option<&str>) -> Result<Vec<ContentImage>>;
    async fn create_image(&self, payload: &ContentImageCreate) -> Result<ContentImage>;
    async fn update_image(&self, id: &str, payload: &ContentImageUpdate) -> Result<ContentImage>;
    async fn delete_image(&self, id: &str) -> Result<()>;
    async fn upload_image(&self, upload: ImageUpload) -> Result<ContentImage>;
}

/// Read-only public surface of the documentation API.
#[async_trait]
pub trait PublicBackend: Send + Sync {
    async fn categories(&self) -> Result<Vec<CategoryPublic>>;
    async fn headings_l1(&self, category_slug: &str) -> Result<Vec<HeadingPublic>>;
    async fn headings_l2(&self, category_slug: &str, h1_slug: &str) -> Result<Vec<HeadingPublic>>;
    async fn page(&self, category_slug: &str, h1_slug: &str, h2_slug: &str) -> Result<PageOut>;
    async fn contents_of(&self, heading_id: &str) -> Result<Vec<ContentPublic>>;
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
    async fn menu(&self) -> Result<Vec<MenuNode>>;
    async fn content_images(&self, content_id: &str) -> Result<Vec<ContentImage>>;
}
