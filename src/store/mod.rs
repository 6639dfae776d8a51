//! In-memory hierarchy state for the authoring console.
//!
//! Holds the list views (categories, headings, contents, images, admins)
//! and the ephemeral Selection Path. The store itself never talks to the
//! network; [`crate::services::AdminConsole`] drives fetches and applies
//! their results here.
//!
//! Every selection change bumps a generation counter and fetch results are
//! applied with the generation current at issue time. A result tagged with
//! a stale generation is discarded, so a late-arriving response for an
//! abandoned selection cannot overwrite newer state.

use crate::models::{AdminUser, Category, Content, ContentImage, Heading, Id};

/// Opaque selection-generation tag handed out when a selection begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// The ephemeral chain of currently chosen entities.
#[derive(Debug, Clone, Default)]
pub struct SelectionPath {
    pub active_category: Option<Category>,
    pub active_h1: Option<Heading>,
    pub active_h2: Option<Heading>,
    /// Heading whose contents are displayed: the L1 itself when it has no
    /// children, or an explicitly chosen L2.
    pub current_heading_id: Option<Id>,
    /// Content focused for image management.
    pub selected_content: Option<Content>,
}

/// In-memory representation of the hierarchy plus the Selection Path.
#[derive(Debug, Default)]
pub struct HierarchyStore {
    pub categories: Vec<Category>,
    pub headings_l1: Vec<Heading>,
    pub headings_l2: Vec<Heading>,
    /// Contents of the current heading.
    pub contents: Vec<Content>,
    /// Images of the selected content.
    pub images: Vec<ContentImage>,
    pub admins: Vec<AdminUser>,
    selection: SelectionPath,
    generation: u64,
}

impl HierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection path.
    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    fn bump(&mut self) -> Generation {
        self.generation += 1;
        Generation(self.generation)
    }

    /// Whether a fetch tagged with `generation` is still the latest.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation.0
    }

    // --- Selection transitions ---

    /// Activate a category, clearing all dependent selection state.
    pub fn select_category(&mut self, category: Category) -> Generation {
        self.selection.active_category = Some(category);
        self.selection.active_h1 = None;
        self.selection.active_h2 = None;
        self.selection.current_heading_id = None;
        self.selection.selected_content = None;
        self.headings_l1.clear();
        self.headings_l2.clear();
        self.contents.clear();
        self.images.clear();
        self.bump()
    }

    /// Activate a primary heading. Returns `None` when it is already active
    /// (re-click guard) so the caller skips the fetch entirely.
    pub fn select_heading_l1(&mut self, heading: Heading) -> Option<Generation> {
        if self
            .selection
            .active_h1
            .as_ref()
            .is_some_and(|h| h.id == heading.id)
        {
            return None;
        }
        self.selection.active_h1 = Some(heading);
        self.selection.active_h2 = None;
        self.selection.current_heading_id = None;
        self.selection.selected_content = None;
        self.headings_l2.clear();
        self.contents.clear();
        self.images.clear();
        Some(self.bump())
    }

    /// Activate a secondary heading and make it the current content heading.
    pub fn select_heading_l2(&mut self, heading: Heading) -> Generation {
        self.selection.current_heading_id = Some(heading.id.clone());
        self.selection.active_h2 = Some(heading);
        self.selection.selected_content = None;
        self.contents.clear();
        self.images.clear();
        self.bump()
    }

    /// Display the contents of a heading without changing the active
    /// headings (L1 without children, or a content refresh target).
    pub fn view_heading_contents(&mut self, heading_id: Id) -> Generation {
        self.selection.current_heading_id = Some(heading_id);
        self.selection.selected_content = None;
        self.contents.clear();
        self.images.clear();
        self.bump()
    }

    /// Begin a refresh of an already-selected scope (sync-after-mutate).
    /// Bumps the generation without touching the Selection Path, so the
    /// focused content survives while stale in-flight fetches are voided.
    pub fn begin_refresh(&mut self) -> Generation {
        self.bump()
    }

    /// Focus a content block for image management.
    pub fn focus_content(&mut self, content: Option<Content>) {
        self.images.clear();
        self.selection.selected_content = content;
    }

    /// Full teardown (logout or top-level navigation).
    pub fn reset(&mut self) {
        self.categories.clear();
        self.headings_l1.clear();
        self.headings_l2.clear();
        self.contents.clear();
        self.images.clear();
        self.admins.clear();
        self.selection = SelectionPath::default();
        self.bump();
    }

    // --- Fetch-result application ---

    /// Replace the category list (not selection-scoped, no generation).
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// Replace the admin list.
    pub fn set_admins(&mut self, admins: Vec<AdminUser>) {
        self.admins = admins;
    }

    /// Apply a fetched L1 list; returns false when discarded as stale.
    pub fn set_headings_l1(&mut self, generation: Generation, headings: Vec<Heading>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.headings_l1 = headings;
        true
    }

    /// Apply a fetched L2 list; returns false when discarded as stale.
    pub fn set_headings_l2(&mut self, generation: Generation, headings: Vec<Heading>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.headings_l2 = headings;
        true
    }

    /// Apply a fetched content list; returns false when discarded as stale.
    pub fn set_contents(&mut self, generation: Generation, contents: Vec<Content>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.contents = contents;
        true
    }

    /// Apply a fetched image list for the focused content.
    pub fn set_images(&mut self, generation: Generation, images: Vec<ContentImage>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.images = images;
        true
    }

    // --- Derived queries ---

    /// Whether any loaded content belongs to the given heading. Gates L2
    /// creation under an L1 that already carries content.
    pub fn heading_has_content(&self, heading_id: &str) -> bool {
        self.contents.iter().any(|c| c.heading_id == heading_id)
    }

    /// Whether the current content heading has any loaded content.
    pub fn current_heading_has_content(&self) -> bool {
        self.selection
            .current_heading_id
            .as_deref()
            .is_some_and(|id| self.heading_has_content(id))
    }

    // --- Optimistic removals ---

    /// Optimistically drop a category and, if it was active, all dependent
    /// selection state.
    pub fn remove_category(&mut self, id: &str) {
        self.categories.retain(|c| c.id != id);
        if self
            .selection
            .active_category
            .as_ref()
            .is_some_and(|c| c.id == id)
        {
            self.selection.active_category = None;
            self.selection.active_h1 = None;
            self.selection.active_h2 = None;
            self.selection.current_heading_id = None;
            self.selection.selected_content = None;
            self.headings_l1.clear();
            self.headings_l2.clear();
            self.contents.clear();
            self.images.clear();
            self.bump();
        }
    }

    /// Optimistically drop a heading from both level lists and clear any
    /// selection state that pointed at it.
    pub fn remove_heading(&mut self, id: &str) {
        self.headings_l1.retain(|h| h.id != id);
        self.headings_l2.retain(|h| h.id != id);

        if self.selection.active_h1.as_ref().is_some_and(|h| h.id == id) {
            self.selection.active_h1 = None;
        }
        if self.selection.active_h2.as_ref().is_some_and(|h| h.id == id) {
            self.selection.active_h2 = None;
        }
        if self.selection.current_heading_id.as_deref() == Some(id) {
            self.selection.current_heading_id = None;
            self.selection.selected_content = None;
            self.contents.clear();
            self.images.clear();
        }
        self.bump();
    }

    /// Optimistically drop a content row.
    pub fn remove_content(&mut self, id: &str) {
        self.contents.retain(|c| c.id != id);
        if self
            .selection
            .selected_content
            .as_ref()
            .is_some_and(|c| c.id == id)
        {
            self.selection.selected_content = None;
            self.images.clear();
        }
    }

    /// Optimistically drop an admin.
    pub fn remove_admin(&mut self, id: &str) {
        self.admins.retain(|a| a.id != id);
    }

    /// Optimistically drop an image of the focused content.
    pub fn remove_image(&mut self, id: &str) {
        self.images.retain(|i| i.id != id);
    }
}
