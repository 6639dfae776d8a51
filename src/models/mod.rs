//! Data models for the documentation hierarchy.

pub mod config;
pub mod dto;
pub mod entity;
pub mod public;

pub use config::ClientConfig;
pub use dto::{
    AdminCreate, CategoryCreate, CategoryUpdate, ContentCreate, ContentImageCreate,
    ContentImageUpdate, ContentUpdate, HeadingCreate, HeadingFilter, HeadingParent, HeadingUpdate,
    ImageSource, ImageUpload, NewImage, PasswordChange, Patch, clear_when_blank, trimmed_or_none,
};
pub use entity::{AdminUser, Category, Content, ContentImage, Heading, HeadingLevel, Id, TokenOut};
pub use public::{CategoryPublic, ContentPublic, HeadingPublic, MenuNode, PageOut, SearchHit, SourceType};
