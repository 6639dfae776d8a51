//! Public reader session.
//!
//! Mirrors the reading experience of the public site: category/heading
//! navigation with auto-selection of the first child, search, and
//! materialization of a full selection path from a search hit. The
//! hit-resolution walk is sequential and network-bound (worst case one
//! request per category and heading); it only runs on an explicit user
//! action, so no client-side index is kept.

use crate::api::PublicBackend;
use crate::error::Result;
use crate::models::{
    CategoryPublic, ContentPublic, HeadingLevel, HeadingPublic, Id, PageOut, SearchHit, SourceType,
};
use crate::resolve::resolve_placeholders;

/// Minimum query length before search fires.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default search result cap.
pub const SEARCH_LIMIT: usize = 20;

/// Selection state of the public reader.
#[derive(Debug, Clone, Default)]
pub struct ReaderState {
    pub categories: Vec<CategoryPublic>,
    pub active_category: Option<CategoryPublic>,
    pub headings_l1: Vec<HeadingPublic>,
    pub active_h1: Option<HeadingPublic>,
    pub headings_l2: Vec<HeadingPublic>,
    pub active_h2: Option<HeadingPublic>,
    /// Rendered page descriptor for an L2 selection.
    pub page: Option<PageOut>,
    /// Content backing the rendered page (drives image resolution).
    pub page_content_id: Option<Id>,
    /// Content list shown when an L1 has no children.
    pub contents: Vec<ContentPublic>,
}

/// Read-only session against the public surface.
pub struct Reader {
    api: Box<dyn PublicBackend>,
    pub state: ReaderState,
}

impl Reader {
    pub fn new(api: Box<dyn PublicBackend>) -> Self {
        Self {
            api,
            state: ReaderState::default(),
        }
    }

    /// Fetch categories and open the first one.
    pub async fn load(&mut self) -> Result<()> {
        let categories = self.api.categories().await?;
        self.state.categories = categories;
        if let Some(first) = self.state.categories.first().cloned() {
            self.pick_category(first).await?;
        }
        Ok(())
    }

    /// Open a category; the first primary heading is opened with it.
    pub async fn pick_category(&mut self, category: CategoryPublic) -> Result<()> {
        self.state.active_h1 = None;
        self.state.active_h2 = None;
        self.state.headings_l2.clear();
        self.state.page = None;
        self.state.page_content_id = None;
        self.state.contents.clear();

        let slug = category.slug.clone();
        self.state.active_category = Some(category);

        let l1 = self.api.headings_l1(&slug).await?;
        self.state.headings_l1 = l1;
        if let Some(first) = self.state.headings_l1.first().cloned() {
            self.pick_h1(first).await?;
        }
        Ok(())
    }

    /// Open a primary heading: the first sub-heading when there is one,
    /// otherwise the heading's own content list.
    pub async fn pick_h1(&mut self, heading: HeadingPublic) -> Result<()> {
        let Some(cat_slug) = self
            .state
            .active_category
            .as_ref()
            .map(|c| c.slug.clone())
        else {
            return Ok(());
        };

        self.state.active_h2 = None;
        self.state.page = None;
        self.state.page_content_id = None;
        self.state.contents.clear();
        self.state.headings_l2.clear();

        let h1_slug = heading.slug.clone();
        let h1_id = heading.id.clone();
        self.state.active_h1 = Some(heading);

        let l2 = self.api.headings_l2(&cat_slug, &h1_slug).await?;
        self.state.headings_l2 = l2;
        match self.state.headings_l2.first().cloned() {
            Some(first) => self.pick_h2(first).await?,
            None => {
                self.state.contents = self.api.contents_of(&h1_id).await?;
            }
        }
        Ok(())
    }

    /// Open a secondary heading: load the page descriptor and remember its
    /// backing content for image resolution.
    pub async fn pick_h2(&mut self, heading: HeadingPublic) -> Result<()> {
        let (Some(cat_slug), Some(h1_slug)) = (
            self.state.active_category.as_ref().map(|c| c.slug.clone()),
            self.state.active_h1.as_ref().map(|h| h.slug.clone()),
        ) else {
            return Ok(());
        };

        self.state.page = None;
        self.state.page_content_id = None;
        self.state.contents.clear();

        let h2_slug = heading.slug.clone();
        let h2_id = heading.id.clone();
        self.state.active_h2 = Some(heading);

        let page = self.api.page(&cat_slug, &h1_slug, &h2_slug).await?;
        self.state.page = Some(page);

        let contents = self.api.contents_of(&h2_id).await?;
        self.state.page_content_id = contents.first().map(|c| c.id.clone());
        Ok(())
    }

    /// Ranked search; queries shorter than [`MIN_QUERY_CHARS`] return
    /// nothing without a network call.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        self.api.search(trimmed, SEARCH_LIMIT).await
    }

    /// Materialize the full selection path for a search hit. Returns false
    /// when the referenced entity cannot be located (first match wins, no
    /// ambiguity handling).
    pub async fn resolve_hit(&mut self, hit: &SearchHit) -> Result<bool> {
        match hit.source_type {
            SourceType::Category => {
                let Some(category) = self
                    .state
                    .categories
                    .iter()
                    .find(|c| c.id == hit.source_id)
                    .cloned()
                else {
                    return Ok(false);
                };
                self.pick_category(category).await?;
                Ok(true)
            }
            SourceType::Heading => self.resolve_heading_hit(&hit.source_id).await,
            SourceType::Content => self.resolve_content_hit(&hit.source_id).await,
        }
    }

    /// A heading hit may be L1 or L2 of unknown parentage: walk each
    /// category's L1 list, then each L1's L2 list.
    async fn resolve_heading_hit(&mut self, heading_id: &str) -> Result<bool> {
        let categories = self.state.categories.clone();
        for category in categories {
            let l1_list = self.api.headings_l1(&category.slug).await?;
            if let Some(h1) = l1_list.iter().find(|h| h.id == heading_id).cloned() {
                self.pick_category(category).await?;
                self.pick_h1(h1).await?;
                return Ok(true);
            }
            for h1 in &l1_list {
                let l2_list = self.api.headings_l2(&category.slug, &h1.slug).await?;
                if let Some(h2) = l2_list.iter().find(|h| h.id == heading_id).cloned() {
                    self.pick_category(category.clone()).await?;
                    self.pick_h1(h1.clone()).await?;
                    self.pick_h2(h2).await?;
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// A content hit is located through the menu tree: fetch each node's
    /// content list, then re-derive the owning category from the L1 lookup.
    async fn resolve_content_hit(&mut self, content_id: &str) -> Result<bool> {
        let menu = self.api.menu().await?;
        for l1_node in &menu {
            let l1_contents = self.api.contents_of(&l1_node.id).await?;
            if l1_contents.iter().any(|c| c.id == content_id) {
                let Some((category, h1)) = self.owning_category_of_h1(&l1_node.id).await? else {
                    continue;
                };
                self.pick_category(category).await?;
                self.pick_h1(h1).await?;
                return Ok(true);
            }

            for l2_node in &l1_node.children {
                let l2_contents = self.api.contents_of(&l2_node.id).await?;
                if l2_contents.iter().any(|c| c.id == content_id) {
                    let Some((category, _)) = self.owning_category_of_h1(&l1_node.id).await? else {
                        continue;
                    };
                    self.pick_category(category).await?;
                    self.pick_h1(l1_node.as_heading(HeadingLevel::Primary)).await?;
                    self.pick_h2(l2_node.as_heading(HeadingLevel::Secondary)).await?;
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Which category owns the given primary heading, if any.
    async fn owning_category_of_h1(
        &self,
        h1_id: &str,
    ) -> Result<Option<(CategoryPublic, HeadingPublic)>> {
        for category in &self.state.categories {
            let l1_list = self.api.headings_l1(&category.slug).await?;
            if let Some(h1) = l1_list.into_iter().find(|h| h.id == h1_id) {
                return Ok(Some((category.clone(), h1)));
            }
        }
        Ok(None)
    }

    /// Fetch a page descriptor by its slug path.
    pub async fn page(&self, category_slug: &str, h1_slug: &str, h2_slug: &str) -> Result<PageOut> {
        self.api.page(category_slug, h1_slug, h2_slug).await
    }

    /// Fetch the nested site menu.
    pub async fn menu(&self) -> Result<Vec<crate::models::MenuNode>> {
        self.api.menu().await
    }

    /// Resolve a content body for display. An image-fetch failure falls
    /// back to the unresolved original rather than partial output.
    pub async fn rendered_body(&self, content_id: &str, body: &str) -> String {
        match self.api.content_images(content_id).await {
            Ok(images) => resolve_placeholders(body, &images),
            Err(e) => {
                log::warn!("image fetch failed for content {content_id}: {e}");
                body.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::AppError;
    use crate::models::{ContentImage, MenuNode};

    #[derive(Default)]
    struct FakeSite {
        categories: Vec<CategoryPublic>,
        /// (category slug, heading)
        l1: Vec<(String, HeadingPublic)>,
        /// (h1 slug, heading)
        l2: Vec<(String, HeadingPublic)>,
        /// (heading id, content)
        contents: Vec<(String, ContentPublic)>,
        images: Vec<ContentImage>,
        fail_images: bool,
        search_calls: Mutex<usize>,
    }

    struct FakePublic {
        site: Arc<FakeSite>,
    }

    #[async_trait]
    impl PublicBackend for FakePublic {
        async fn categories(&self) -> Result<Vec<CategoryPublic>> {
            Ok(self.site.categories.clone())
        }

        async fn headings_l1(&self, category_slug: &str) -> Result<Vec<HeadingPublic>> {
            Ok(self
                .site
                .l1
                .iter()
                .filter(|(slug, _)| slug == category_slug)
                .map(|(_, h)| h.clone())
                .collect())
        }

        async fn headings_l2(
            &self,
            _category_slug: &str,
            h1_slug: &str,
        ) -> Result<Vec<HeadingPublic>> {
            Ok(self
                .site
                .l2
                .iter()
                .filter(|(slug, _)| slug == h1_slug)
                .map(|(_, h)| h.clone())
                .collect())
        }

        async fn page(
            &self,
            category_slug: &str,
            h1_slug: &str,
            h2_slug: &str,
        ) -> Result<PageOut> {
            let body = self
                .site
                .l2
                .iter()
                .find(|(parent, h)| parent == h1_slug && h.slug == h2_slug)
                .and_then(|(_, h)| {
                    self.site
                        .contents
                        .iter()
                        .find(|(heading_id, _)| heading_id == &h.id)
                })
                .map(|(_, c)| c.body.clone())
                .unwrap_or_default();
            Ok(PageOut {
                category: category_slug.to_string(),
                h1: h1_slug.to_string(),
                h2: Some(h2_slug.to_string()),
                title: h2_slug.to_string(),
                body,
                description: None,
            })
        }

        async fn contents_of(&self, heading_id: &str) -> Result<Vec<ContentPublic>> {
            Ok(self
                .site
                .contents
                .iter()
                .filter(|(id, _)| id == heading_id)
                .map(|(_, c)| c.clone())
                .collect())
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
            *self.site.search_calls.lock().unwrap() += 1;
            Ok(Vec::new())
        }

        async fn menu(&self) -> Result<Vec<MenuNode>> {
            let mut nodes = Vec::new();
            for (_, h1) in &self.site.l1 {
                let children = self
                    .site
                    .l2
                    .iter()
                    .filter(|(parent, _)| parent == &h1.slug)
                    .map(|(_, h2)| MenuNode {
                        id: h2.id.clone(),
                        title: h2.title.clone(),
                        slug: h2.slug.clone(),
                        sort_order: h2.sort_order,
                        children: Vec::new(),
                    })
                    .collect();
                nodes.push(MenuNode {
                    id: h1.id.clone(),
                    title: h1.title.clone(),
                    slug: h1.slug.clone(),
                    sort_order: h1.sort_order,
                    children,
                });
            }
            Ok(nodes)
        }

        async fn content_images(&self, content_id: &str) -> Result<Vec<ContentImage>> {
            if self.site.fail_images {
                return Err(AppError::remote(500, "images unavailable"));
            }
            Ok(self
                .site
                .images
                .iter()
                .filter(|i| i.content_id == content_id)
                .cloned()
                .collect())
        }
    }

    fn category(id: &str, name: &str) -> CategoryPublic {
        CategoryPublic {
            id: id.into(),
            name: name.into(),
            slug: name.to_lowercase(),
            sort_order: 0,
        }
    }

    fn heading(id: &str, level: HeadingLevel, title: &str) -> HeadingPublic {
        HeadingPublic {
            id: id.into(),
            level,
            title: title.into(),
            slug: title.to_lowercase(),
            sort_order: 0,
        }
    }

    fn content(id: &str, heading_id: &str, body: &str) -> ContentPublic {
        ContentPublic {
            id: id.into(),
            heading_id: heading_id.into(),
            body: body.into(),
            description: None,
        }
    }

    fn image(id: &str, content_id: &str, url: &str, sort_order: i32) -> ContentImage {
        ContentImage {
            id: id.into(),
            content_id: content_id.into(),
            url: url.into(),
            alt: None,
            sort_order,
            width: None,
            height: None,
            created_at: "2025-01-01T00:00:00".into(),
            updated_at: "2025-01-01T00:00:00".into(),
        }
    }

    /// Guides → Setup → {Install, Upgrade}; Reference → Api (no children).
    fn sample_site() -> FakeSite {
        FakeSite {
            categories: vec![category("c1", "Guides"), category("c2", "Reference")],
            l1: vec![
                ("guides".into(), heading("h1", HeadingLevel::Primary, "Setup")),
                ("reference".into(), heading("h3", HeadingLevel::Primary, "Api")),
            ],
            l2: vec![
                ("setup".into(), heading("h2", HeadingLevel::Secondary, "Install")),
                ("setup".into(), heading("h4", HeadingLevel::Secondary, "Upgrade")),
            ],
            contents: vec![
                (
                    "h2".into(),
                    content("ct1", "h2", "Install it <--image--> then run it"),
                ),
                ("h3".into(), content("ct2", "h3", "Plain api reference body")),
            ],
            images: vec![image("i1", "ct1", "https://cdn.example.com/install.png", 0)],
            ..FakeSite::default()
        }
    }

    fn reader(site: FakeSite) -> Reader {
        Reader::new(Box::new(FakePublic {
            site: Arc::new(site),
        }))
    }

    #[tokio::test]
    async fn test_load_auto_selects_down_the_tree() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        // First category, first L1, first L2 are all opened.
        assert_eq!(
            reader.state.active_category.as_ref().unwrap().slug,
            "guides"
        );
        assert_eq!(reader.state.active_h1.as_ref().unwrap().slug, "setup");
        assert_eq!(reader.state.active_h2.as_ref().unwrap().slug, "install");
        assert!(reader.state.page.is_some());
        assert_eq!(reader.state.page_content_id.as_deref(), Some("ct1"));
    }

    #[tokio::test]
    async fn test_h1_without_children_loads_own_contents() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        reader.pick_category(category("c2", "Reference")).await.unwrap();
        assert_eq!(reader.state.active_h1.as_ref().unwrap().slug, "api");
        assert!(reader.state.active_h2.is_none());
        assert!(reader.state.page.is_none());
        assert_eq!(reader.state.contents.len(), 1);
        assert_eq!(reader.state.contents[0].id, "ct2");
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let site = Arc::new(sample_site());
        let reader = Reader::new(Box::new(FakePublic {
            site: Arc::clone(&site),
        }));

        assert!(reader.search(" a ").await.unwrap().is_empty());
        assert_eq!(*site.search_calls.lock().unwrap(), 0);

        reader.search("api").await.unwrap();
        assert_eq!(*site.search_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resolve_heading_hit_finds_l2() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        let hit = SearchHit {
            source_type: SourceType::Heading,
            source_id: "h4".into(),
            matched_text: "Upgrade".into(),
            similarity_score: 0.8,
        };
        assert!(reader.resolve_hit(&hit).await.unwrap());
        assert_eq!(reader.state.active_category.as_ref().unwrap().id, "c1");
        assert_eq!(reader.state.active_h1.as_ref().unwrap().id, "h1");
        assert_eq!(reader.state.active_h2.as_ref().unwrap().id, "h4");
    }

    #[tokio::test]
    async fn test_resolve_content_hit_materializes_path() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        // ct2 hangs off the childless L1 "Api" in "Reference".
        let hit = SearchHit {
            source_type: SourceType::Content,
            source_id: "ct2".into(),
            matched_text: "reference".into(),
            similarity_score: 0.7,
        };
        assert!(reader.resolve_hit(&hit).await.unwrap());
        assert_eq!(reader.state.active_category.as_ref().unwrap().id, "c2");
        assert_eq!(reader.state.active_h1.as_ref().unwrap().id, "h3");
        assert!(reader.state.active_h2.is_none());
        assert_eq!(reader.state.contents.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_content_hit_under_l2() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        let hit = SearchHit {
            source_type: SourceType::Content,
            source_id: "ct1".into(),
            matched_text: "Install".into(),
            similarity_score: 0.9,
        };
        assert!(reader.resolve_hit(&hit).await.unwrap());
        assert_eq!(reader.state.active_h2.as_ref().unwrap().id, "h2");
        assert_eq!(reader.state.page_content_id.as_deref(), Some("ct1"));
    }

    #[tokio::test]
    async fn test_unknown_hit_reports_not_found() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        let hit = SearchHit {
            source_type: SourceType::Heading,
            source_id: "h999".into(),
            matched_text: "ghost".into(),
            similarity_score: 0.1,
        };
        assert!(!reader.resolve_hit(&hit).await.unwrap());
    }

    #[tokio::test]
    async fn test_rendered_body_resolves_images() {
        let mut reader = reader(sample_site());
        reader.load().await.unwrap();

        let body = reader
            .rendered_body("ct1", "Install it <--image--> then run it")
            .await;
        assert_eq!(
            body,
            "Install it ![Image](https://cdn.example.com/install.png) then run it"
        );
    }

    #[tokio::test]
    async fn test_rendered_body_falls_back_when_images_fail() {
        let mut site = sample_site();
        site.fail_images = true;
        let mut reader = reader(site);
        reader.load().await.unwrap();

        let original = "Install it <--image--> then run it";
        let body = reader.rendered_body("ct1", original).await;
        assert_eq!(body, original);
    }
}
