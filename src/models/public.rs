//! Read-only views served to the public reader.

use serde::{Deserialize, Serialize};

use crate::models::entity::{HeadingLevel, Id};

/// Category as listed on the public site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryPublic {
    pub id: Id,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

/// Heading as listed on the public site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingPublic {
    pub id: Id,
    pub level: HeadingLevel,
    pub title: String,
    pub slug: String,
    pub sort_order: i32,
}

/// Rendered page descriptor for a category/h1/h2 path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageOut {
    pub category: String,
    pub h1: String,
    #[serde(default)]
    pub h2: Option<String>,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// What kind of entity a search hit points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Category,
    Heading,
    Content,
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub source_type: SourceType,
    pub source_id: Id,
    pub matched_text: String,
    pub similarity_score: f32,
}

/// Content block as served publicly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentPublic {
    pub id: Id,
    pub heading_id: Id,
    pub body: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One node of the nested site menu (L1 headings with L2 children).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuNode {
    pub id: Id,
    pub title: String,
    pub slug: String,
    pub sort_order: i32,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// View a menu node as a heading of the given level.
    pub fn as_heading(&self, level: HeadingLevel) -> HeadingPublic {
        HeadingPublic {
            id: self.id.clone(),
            level,
            title: self.title.clone(),
            slug: self.slug.clone(),
            sort_order: self.sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_wire_format() {
        let hit: SearchHit = serde_json::from_str(
            r#"{"source_type":"heading","source_id":"h1","matched_text":"Setup","similarity_score":0.9}"#,
        )
        .unwrap();
        assert_eq!(hit.source_type, SourceType::Heading);
    }

    #[test]
    fn test_menu_node_children_default_empty() {
        let node: MenuNode = serde_json::from_str(
            r#"{"id":"h1","title":"Setup","slug":"setup","sort_order":0}"#,
        )
        .unwrap();
        assert!(node.children.is_empty());
        let heading = node.as_heading(HeadingLevel::Primary);
        assert_eq!(heading.slug, "setup");
    }
}
