//! Admin-side entity records as served by the API.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Server-assigned opaque identifier.
pub type Id = String;

/// Root of the content hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Id,

    /// Display name (unique per deployment)
    pub name: String,

    /// URL-safe slug derived server-side from the name
    pub slug: String,

    #[serde(default)]
    pub description: Option<String>,

    pub sort_order: i32,

    pub created_at: String,
    pub updated_at: String,
}

/// Heading depth within a category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    /// Owned directly by a category
    Primary,
    /// Owned by a primary heading
    Secondary,
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::Primary => 1,
            HeadingLevel::Secondary => 2,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(HeadingLevel::Primary),
            2 => Ok(HeadingLevel::Secondary),
            other => Err(format!("heading level must be 1 or 2, got {other}")),
        }
    }
}

/// A heading at either level.
///
/// Exactly one of `category_id` (level 1) and `parent_heading_id` (level 2)
/// is set; [`Heading::parent`] checks the pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
    pub id: Id,

    pub level: HeadingLevel,

    #[serde(default)]
    pub category_id: Option<Id>,

    #[serde(default)]
    pub parent_heading_id: Option<Id>,

    pub title: String,

    pub slug: String,

    #[serde(default)]
    pub description: Option<String>,

    pub sort_order: i32,

    pub created_at: String,
    pub updated_at: String,
}

impl Heading {
    /// Validate the level/parent pairing and return the parent reference.
    pub fn parent(&self) -> Result<super::dto::HeadingParent> {
        super::dto::HeadingParent::from_raw(
            self.level,
            self.category_id.clone(),
            self.parent_heading_id.clone(),
        )
    }
}

/// A markdown content block attached to a heading.
///
/// The body may contain `<--image-->` placeholder tokens; see
/// [`crate::resolve`] for the pairing rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub id: Id,

    pub heading_id: Id,

    /// Raw markdown, placeholders unresolved
    pub body: String,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// An image record bound to a content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentImage {
    pub id: Id,

    pub content_id: Id,

    pub url: String,

    #[serde(default)]
    pub alt: Option<String>,

    /// Rank among the content's images; pairs with placeholder order
    pub sort_order: i32,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    pub created_at: String,
    pub updated_at: String,
}

/// An authoring-console account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: Id,

    /// Unique, compared case-insensitively
    pub email: String,

    pub created_at: String,
}

impl AdminUser {
    /// Case-insensitive email comparison.
    pub fn email_matches(&self, other: &str) -> bool {
        self.email.eq_ignore_ascii_case(other.trim())
    }
}

/// Bearer token returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenOut {
    pub access_token: String,
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_roundtrip() {
        let json = serde_json::to_string(&HeadingLevel::Secondary).unwrap();
        assert_eq!(json, "2");
        let level: HeadingLevel = serde_json::from_str("1").unwrap();
        assert_eq!(level, HeadingLevel::Primary);
        assert!(serde_json::from_str::<HeadingLevel>("3").is_err());
    }

    #[test]
    fn test_heading_parent_consistency() {
        let heading = Heading {
            id: "h1".into(),
            level: HeadingLevel::Primary,
            category_id: Some("c1".into()),
            parent_heading_id: None,
            title: "Setup".into(),
            slug: "setup".into(),
            description: None,
            sort_order: 0,
            created_at: "2025-01-01T00:00:00".into(),
            updated_at: "2025-01-01T00:00:00".into(),
        };
        assert!(heading.parent().is_ok());

        let broken = Heading {
            parent_heading_id: Some("h0".into()),
            ..heading
        };
        assert!(broken.parent().is_err());
    }

    #[test]
    fn test_email_matches_case_insensitive() {
        let admin = AdminUser {
            id: "a1".into(),
            email: "Admin@X.com".into(),
            created_at: "2025-01-01T00:00:00".into(),
        };
        assert!(admin.email_matches("admin@x.com"));
        assert!(admin.email_matches("  ADMIN@X.COM "));
        assert!(!admin.email_matches("other@x.com"));
    }
}
