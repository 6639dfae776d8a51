//! Request payloads for the admin API.
//!
//! Update payloads follow PATCH-style semantics: an omitted field leaves the
//! server value untouched, while an explicit `null` clears it. The
//! [`Patch`] alias encodes that distinction as a double `Option`.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::entity::{HeadingLevel, Id};

/// Three-state update field.
///
/// - `None`: field absent from the payload, server value untouched
/// - `Some(None)`: serialized as `null`, clears the field
/// - `Some(Some(v))`: sets the field to `v`
pub type Patch<T> = Option<Option<T>>;

/// Trim optional text; blank input becomes "not provided".
pub fn trimmed_or_none(input: Option<&str>) -> Option<String> {
    input.and_then(|s| {
        let t = s.trim();
        (!t.is_empty()).then(|| t.to_string())
    })
}

/// Trim optional text for an update; blank input becomes an explicit clear.
pub fn clear_when_blank(input: Option<&str>) -> Patch<String> {
    input.map(|s| {
        let t = s.trim();
        (!t.is_empty()).then(|| t.to_string())
    })
}

// --- Categories ---

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCreate {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Patch<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

// --- Headings ---

/// The single parent reference of a heading.
///
/// Makes the level invariant unrepresentable: a level-1 heading can only
/// point at a category, a level-2 heading only at a primary heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingParent {
    Category(Id),
    Heading(Id),
}

impl HeadingParent {
    /// Level implied by the parent kind.
    pub fn level(&self) -> HeadingLevel {
        match self {
            HeadingParent::Category(_) => HeadingLevel::Primary,
            HeadingParent::Heading(_) => HeadingLevel::Secondary,
        }
    }

    /// Build from raw wire-shaped input, rejecting mismatched pairings
    /// before any network call is possible.
    pub fn from_raw(
        level: HeadingLevel,
        category_id: Option<Id>,
        parent_heading_id: Option<Id>,
    ) -> Result<Self> {
        match (level, category_id, parent_heading_id) {
            (HeadingLevel::Primary, Some(cat), None) => Ok(HeadingParent::Category(cat)),
            (HeadingLevel::Secondary, None, Some(parent)) => Ok(HeadingParent::Heading(parent)),
            (HeadingLevel::Primary, _, Some(_)) => Err(AppError::validation(
                "a level-1 heading cannot have a parent heading",
            )),
            (HeadingLevel::Secondary, Some(_), _) => Err(AppError::validation(
                "a level-2 heading cannot belong directly to a category",
            )),
            (HeadingLevel::Primary, None, None) => {
                Err(AppError::validation("a level-1 heading requires a category"))
            }
            (HeadingLevel::Secondary, None, None) => Err(AppError::validation(
                "a level-2 heading requires a parent heading",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadingCreate {
    pub level: HeadingLevel,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_heading_id: Option<Id>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl HeadingCreate {
    /// Build a payload from a parent reference; the level and the matching
    /// foreign key are filled in together.
    pub fn new(parent: HeadingParent, title: impl Into<String>) -> Self {
        let level = parent.level();
        let (category_id, parent_heading_id) = match parent {
            HeadingParent::Category(id) => (Some(id), None),
            HeadingParent::Heading(id) => (None, Some(id)),
        };
        Self {
            level,
            category_id,
            parent_heading_id,
            title: title.into(),
            description: None,
            sort_order: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Patch<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

/// Filter for the heading list endpoint.
#[derive(Debug, Clone, Default)]
pub struct HeadingFilter {
    pub level: Option<HeadingLevel>,
    pub category_id: Option<Id>,
    pub parent_heading_id: Option<Id>,
}

impl HeadingFilter {
    /// Primary headings of a category.
    pub fn primary_of(category_id: impl Into<Id>) -> Self {
        Self {
            level: Some(HeadingLevel::Primary),
            category_id: Some(category_id.into()),
            parent_heading_id: None,
        }
    }

    /// Secondary headings under a primary heading.
    pub fn secondary_of(parent_heading_id: impl Into<Id>) -> Self {
        Self {
            level: Some(HeadingLevel::Secondary),
            category_id: None,
            parent_heading_id: Some(parent_heading_id.into()),
        }
    }

    /// Query-string pairs for the list endpoint.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(level) = self.level {
            pairs.push(("level", u8::from(level).to_string()));
        }
        if let Some(ref id) = self.category_id {
            pairs.push(("category_id", id.clone()));
        }
        if let Some(ref id) = self.parent_heading_id {
            pairs.push(("parent_heading_id", id.clone()));
        }
        pairs
    }
}

// --- Contents ---

#[derive(Debug, Clone, Serialize)]
pub struct ContentCreate {
    pub heading_id: Id,

    pub body: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Patch<String>,
}

// --- Content images ---

#[derive(Debug, Clone, Serialize)]
pub struct ContentImageCreate {
    pub content_id: Id,

    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentImageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Patch<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Where a pending image comes from during content creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Local file, persisted through the multipart upload endpoint
    File(PathBuf),
    /// Remote URL, persisted through a plain image-record create
    Url(String),
}

/// An image attached to a content block before the block exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub source: ImageSource,
    pub alt: Option<String>,
    pub sort_order: i32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Multipart upload payload; file bytes are read before the call so backends
/// never touch the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub content_id: Id,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub alt: Option<String>,
    pub sort_order: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

// --- Admin users ---

#[derive(Debug, Clone, Serialize)]
pub struct AdminCreate {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub password: String,
}
