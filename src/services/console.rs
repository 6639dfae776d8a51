//! Authoring console session.
//!
//! Drives the admin workflow against an [`AdminBackend`]: hierarchy
//! selection with dependent fetches, and optimistic create/update/delete
//! with rollback and re-fetch-on-settle.
//!
//! Mutation pattern, uniform across entity types:
//! 1. deletes pass an async confirm gate first; "no" aborts silently
//! 2. the in-memory store is updated optimistically (deletes only; creates
//!    wait for the server-assigned id, updates rely on the refresh)
//! 3. the request is issued
//! 4. win or lose, the authoritative list for that scope is re-fetched, so
//!    any divergence self-heals within one round trip

use std::path::Path;

use crate::api::AdminBackend;
use crate::error::{AppError, Result};
use crate::gateway::{CredentialStore, Theme};
use crate::interact::{InteractionGate, Notifier};
use crate::models::{
    AdminCreate, CategoryCreate, CategoryUpdate, ContentCreate, ContentImageCreate,
    ContentImageUpdate, ContentUpdate, HeadingCreate, HeadingFilter, HeadingParent, HeadingUpdate,
    Id, ImageSource, ImageUpload, NewImage, clear_when_blank, trimmed_or_none,
};
use crate::store::{Generation, HierarchyStore};
use crate::validate;

/// Admin session: backend, interaction surfaces, and the hierarchy store.
pub struct AdminConsole {
    api: Box<dyn AdminBackend>,
    gate: Box<dyn InteractionGate>,
    credentials: CredentialStore,
    pub store: HierarchyStore,
    pub notifier: Notifier,
}

impl AdminConsole {
    /// Create a console session. The token (if any) is hydrated lazily from
    /// the credential store on each request.
    pub fn new(
        api: Box<dyn AdminBackend>,
        gate: Box<dyn InteractionGate>,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            api,
            gate,
            credentials,
            store: HierarchyStore::new(),
            notifier: Notifier::new(),
        }
    }

    /// Whether a persisted session token exists.
    pub fn has_session(&self) -> bool {
        self.credentials.token().is_some()
    }

    /// Persisted theme preference.
    pub fn theme(&self) -> Theme {
        self.credentials.theme()
    }

    /// Persist the theme preference.
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.credentials.set_theme(theme)
    }

    // --- Session ---

    /// Sign in and persist the bearer token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        if let Err(e) = validate::email(email).and_then(|_| validate::required("password", password))
        {
            self.notifier.error(e.to_string());
            return Err(e);
        }

        match self.api.login(email.trim(), password).await {
            Ok(token) => {
                self.credentials.set_token(&token.access_token)?;
                self.notifier.success("Signed in");
                Ok(())
            }
            Err(e) => {
                self.notifier.error(format!("Sign-in failed: {e}"));
                Err(e)
            }
        }
    }

    /// Clear the token and tear down all session state.
    pub fn logout(&mut self) {
        self.credentials.clear_token();
        self.store.reset();
        self.notifier.success("Signed out");
    }

    /// Validate the session and load the top-level lists.
    pub async fn startup(&mut self) -> Result<()> {
        self.api.me().await?;
        self.refresh_categories().await?;
        self.refresh_admins().await?;
        Ok(())
    }

    // --- Selection ---

    /// Activate a category and fetch its primary headings.
    pub async fn select_category(&mut self, category_id: &str) -> Result<()> {
        let Some(category) = self
            .store
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
        else {
            return Err(AppError::validation(format!(
                "unknown category {category_id}"
            )));
        };

        let generation = self.store.select_category(category);
        let filter = HeadingFilter::primary_of(category_id);
        match self.api.list_headings(&filter).await {
            Ok(list) => {
                self.store.set_headings_l1(generation, list);
            }
            // Selection-time fetch failures are swallowed: the UI shows an
            // empty list and the user can retry.
            Err(e) => log::warn!("heading fetch failed for category {category_id}: {e}"),
        }
        Ok(())
    }

    /// Activate a primary heading, fetch its children, and auto-select the
    /// first child (or the heading's own contents when it has none).
    pub async fn select_heading_l1(&mut self, heading_id: &str) -> Result<()> {
        let Some(heading) = self
            .store
            .headings_l1
            .iter()
            .find(|h| h.id == heading_id)
            .cloned()
        else {
            return Err(AppError::validation(format!(
                "unknown heading {heading_id}"
            )));
        };

        // Re-click on the active heading is a no-op.
        let Some(generation) = self.store.select_heading_l1(heading) else {
            return Ok(());
        };

        let filter = HeadingFilter::secondary_of(heading_id);
        match self.api.list_headings(&filter).await {
            Ok(list) => {
                if !self.store.set_headings_l2(generation, list) {
                    return Ok(());
                }
            }
            Err(e) => {
                log::warn!("sub-heading fetch failed for heading {heading_id}: {e}");
                return Ok(());
            }
        }

        match self.store.headings_l2.first().cloned() {
            Some(first) => {
                let generation = self.store.select_heading_l2(first.clone());
                self.fetch_contents(generation, &first.id).await;
            }
            None => self.view_heading(heading_id.to_string()).await,
        }
        Ok(())
    }

    /// Activate a secondary heading and fetch its contents.
    pub async fn select_heading_l2(&mut self, heading_id: &str) -> Result<()> {
        let Some(heading) = self
            .store
            .headings_l2
            .iter()
            .find(|h| h.id == heading_id)
            .cloned()
        else {
            return Err(AppError::validation(format!(
                "unknown sub-heading {heading_id}"
            )));
        };

        let generation = self.store.select_heading_l2(heading);
        self.fetch_contents(generation, heading_id).await;
        Ok(())
    }

    async fn view_heading(&mut self, heading_id: Id) {
        let generation = self.store.view_heading_contents(heading_id.clone());
        self.fetch_contents(generation, &heading_id).await;
    }

    async fn fetch_contents(&mut self, generation: Generation, heading_id: &str) {
        match self.api.list_contents(Some(heading_id)).await {
            Ok(list) => {
                self.store.set_contents(generation, list);
            }
            Err(e) => log::warn!("content fetch failed for heading {heading_id}: {e}"),
        }
    }

    // --- List refreshes (sync-after-mutate) ---

    async fn refresh_categories(&mut self) -> Result<()> {
        let categories = self.api.list_categories().await?;
        self.store.set_categories(categories);
        Ok(())
    }

    async fn refresh_admins(&mut self) -> Result<()> {
        let admins = self.api.list_admins().await?;
        self.store.set_admins(admins);
        Ok(())
    }

    async fn resync_categories(&mut self) {
        if let Err(e) = self.refresh_categories().await {
            log::warn!("category resync failed: {e}");
        }
    }

    async fn resync_admins(&mut self) {
        if let Err(e) = self.refresh_admins().await {
            log::warn!("admin resync failed: {e}");
        }
    }

    /// Re-fetch both heading lists for the active selection.
    async fn resync_headings(&mut self) {
        if let Some(category_id) = self
            .store
            .selection()
            .active_category
            .as_ref()
            .map(|c| c.id.clone())
        {
            let generation = self.store.begin_refresh();
            match self
                .api
                .list_headings(&HeadingFilter::primary_of(category_id.clone()))
                .await
            {
                Ok(list) => {
                    self.store.set_headings_l1(generation, list);
                }
                Err(e) => log::warn!("heading resync failed for category {category_id}: {e}"),
            }
        }

        if let Some(h1_id) = self
            .store
            .selection()
            .active_h1
            .as_ref()
            .map(|h| h.id.clone())
        {
            let generation = self.store.begin_refresh();
            match self
                .api
                .list_headings(&HeadingFilter::secondary_of(h1_id.clone()))
                .await
            {
                Ok(list) => {
                    self.store.set_headings_l2(generation, list);
                }
                Err(e) => log::warn!("sub-heading resync failed for heading {h1_id}: {e}"),
            }
        }
    }

    /// Re-fetch contents of the current heading, falling back to an explicit
    /// heading when nothing is current yet.
    async fn resync_contents(&mut self, fallback_heading: Option<&str>) {
        let current = self.store.selection().current_heading_id.clone();
        match current {
            Some(heading_id) => {
                let generation = self.store.begin_refresh();
                self.fetch_contents(generation, &heading_id).await;
            }
            None => {
                if let Some(heading_id) = fallback_heading {
                    self.view_heading(heading_id.to_string()).await;
                }
            }
        }
    }

    // --- Categories ---

    /// Create a category; duplicate names surface as a distinct message.
    pub async fn create_category(
        &mut self,
        name: &str,
        description: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<()> {
        if let Err(e) = validate::required("category name", name) {
            self.notifier.error(e.to_string());
            return Err(e);
        }

        let payload = CategoryCreate {
            name: name.trim().to_string(),
            description: trimmed_or_none(description),
            sort_order,
        };
        match self.api.create_category(&payload).await {
            Ok(_) => {
                self.resync_categories().await;
                self.notifier
                    .success(format!("Category '{}' created", payload.name));
                Ok(())
            }
            Err(e) if e.is_conflict() => {
                self.notifier
                    .error("A category with this name already exists");
                Err(e)
            }
            Err(e) => {
                self.notifier
                    .error(format!("Category could not be created: {e}"));
                Err(e)
            }
        }
    }

    /// Update category fields. A blank description clears the server value;
    /// an omitted one leaves it untouched.
    pub async fn update_category(
        &mut self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<()> {
        let payload = CategoryUpdate {
            name: trimmed_or_none(name),
            description: clear_when_blank(description),
            sort_order,
        };
        match self.api.update_category(id, &payload).await {
            Ok(_) => {
                self.resync_categories().await;
                self.notifier.success("Category updated");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Category could not be updated: {e}"));
                Err(e)
            }
        }
    }

    /// Delete a category after confirmation; descendants are removed
    /// server-side and the client converges on the re-fetch.
    pub async fn delete_category(&mut self, id: &str) -> Result<()> {
        let confirmed = self
            .gate
            .confirm(
                "Delete category",
                "Permanently delete this category? Its headings are deleted as well.",
            )
            .await;
        if !confirmed {
            return Ok(());
        }

        self.store.remove_category(id);
        let result = self.api.delete_category(id).await;
        // The re-fetch is the sole correction mechanism: a failed delete is
        // not rolled back locally, the authoritative list restores the row.
        self.resync_categories().await;

        match result {
            Ok(()) => {
                self.notifier.success("Category deleted");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Category could not be deleted: {e}"));
                Err(e)
            }
        }
    }

    // --- Headings ---

    /// Create a heading under a category (level 1) or a primary heading
    /// (level 2). A primary heading that already carries content cannot
    /// receive children; the server enforces this too.
    pub async fn create_heading(&mut self, parent: HeadingParent, title: &str) -> Result<()> {
        if let Err(e) = validate::required("heading title", title) {
            self.notifier.error(e.to_string());
            return Err(e);
        }
        if let HeadingParent::Heading(parent_id) = &parent {
            if self.store.heading_has_content(parent_id) {
                let e = AppError::validation(
                    "this heading already has content and cannot receive sub-headings",
                );
                self.notifier.error(e.to_string());
                return Err(e);
            }
        }

        let payload = HeadingCreate::new(parent, title.trim());
        match self.api.create_heading(&payload).await {
            Ok(_) => {
                self.resync_headings().await;
                self.notifier
                    .success(format!("Heading '{}' created", payload.title));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Heading could not be created: {e}"));
                Err(e)
            }
        }
    }

    /// Update heading fields with the same blank-clears-description rule as
    /// categories.
    pub async fn update_heading(
        &mut self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<()> {
        let payload = HeadingUpdate {
            title: trimmed_or_none(title),
            description: clear_when_blank(description),
            sort_order,
        };
        match self.api.update_heading(id, &payload).await {
            Ok(_) => {
                self.resync_headings().await;
                self.notifier.success("Heading updated");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Heading could not be updated: {e}"));
                Err(e)
            }
        }
    }

    /// Delete a heading after confirmation.
    pub async fn delete_heading(&mut self, id: &str) -> Result<()> {
        let confirmed = self
            .gate
            .confirm(
                "Delete heading",
                "Permanently delete this heading? Sub-headings and contents are deleted as well.",
            )
            .await;
        if !confirmed {
            return Ok(());
        }

        self.store.remove_heading(id);
        let result = self.api.delete_heading(id).await;
        self.resync_headings().await;

        match result {
            Ok(()) => {
                self.notifier.success("Heading deleted");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Heading could not be deleted: {e}"));
                Err(e)
            }
        }
    }

    // --- Contents ---

    /// Create a content block, optionally with attached images.
    ///
    /// Composition order is fixed: the content row first (its id binds the
    /// images), then file uploads one by one, then all URL-backed image
    /// records as a concurrent all-or-nothing batch. Any image failure
    /// triggers a best-effort delete of the content row; see
    /// [`AppError::PartialFailure`] for the two outcomes.
    pub async fn create_content(
        &mut self,
        heading_id: &str,
        body: &str,
        description: Option<&str>,
        images: Vec<NewImage>,
    ) -> Result<()> {
        if let Err(e) = validate::content_body(body) {
            self.notifier.error(e.to_string());
            return Err(e);
        }
        for image in &images {
            if let ImageSource::Url(url) = &image.source {
                if let Err(e) = validate::image_url(url) {
                    self.notifier.error(e.to_string());
                    return Err(e);
                }
            }
        }

        let payload = ContentCreate {
            heading_id: heading_id.to_string(),
            body: body.to_string(),
            description: trimmed_or_none(description),
        };
        let content = match self.api.create_content(&payload).await {
            Ok(content) => content,
            Err(e) => {
                self.notifier
                    .error(format!("Content could not be created: {e}"));
                return Err(e);
            }
        };

        let image_count = images.len();
        if image_count > 0 {
            let mut url_payloads = Vec::new();
            let mut file_jobs = Vec::new();
            for image in images {
                match &image.source {
                    ImageSource::File(_) => file_jobs.push(image),
                    ImageSource::Url(url) => url_payloads.push(ContentImageCreate {
                        content_id: content.id.clone(),
                        url: url.clone(),
                        alt: image.alt.clone(),
                        sort_order: Some(image.sort_order),
                        width: image.width,
                        height: image.height,
                    }),
                }
            }

            // Uploads are strictly sequential; each binds to the new id.
            for image in &file_jobs {
                let ImageSource::File(path) = &image.source else {
                    continue;
                };
                if let Err(cause) = self.upload_new_image(&content.id, path, image).await {
                    return self.rollback_content_creation(&content.id, cause).await;
                }
            }

            // URL-backed records go out together; the first rejection
            // short-circuits the batch.
            if !url_payloads.is_empty() {
                let batch = futures::future::try_join_all(
                    url_payloads.iter().map(|p| self.api.create_image(p)),
                )
                .await;
                if let Err(cause) = batch {
                    return self.rollback_content_creation(&content.id, cause).await;
                }
            }
        }

        self.resync_contents(Some(heading_id)).await;
        if image_count > 0 {
            self.notifier
                .success(format!("Content and {image_count} image(s) created"));
        } else {
            self.notifier.success("Content created");
        }
        Ok(())
    }

    async fn upload_new_image(
        &self,
        content_id: &str,
        path: &Path,
        image: &NewImage,
    ) -> Result<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        self.api
            .upload_image(ImageUpload {
                content_id: content_id.to_string(),
                file_name,
                bytes,
                alt: image.alt.clone(),
                sort_order: Some(image.sort_order),
                width: image.width,
                height: image.height,
            })
            .await?;
        Ok(())
    }

    /// Best-effort rollback of a freshly created content row. The two
    /// failure modes must be visibly different to the user.
    async fn rollback_content_creation(
        &mut self,
        content_id: &str,
        cause: AppError,
    ) -> Result<()> {
        log::warn!("image step failed for content {content_id}: {cause}");
        let err = match self.api.delete_content(content_id).await {
            Ok(()) => {
                let err = AppError::partial_rolled_back(content_id, &cause);
                self.notifier.error(err.to_string());
                err
            }
            Err(rollback_err) => {
                log::error!("rollback delete failed for content {content_id}: {rollback_err}");
                let err = AppError::partial_dangling(content_id, &cause);
                self.notifier.warning(err.to_string());
                err
            }
        };
        self.resync_contents(None).await;
        Err(err)
    }

    /// Update a content block.
    pub async fn update_content(
        &mut self,
        id: &str,
        body: Option<&str>,
        description: Option<&str>,
    ) -> Result<()> {
        if let Some(body) = body {
            if let Err(e) = validate::content_body(body) {
                self.notifier.error(e.to_string());
                return Err(e);
            }
        }

        let payload = ContentUpdate {
            body: body.map(str::to_string),
            description: clear_when_blank(description),
        };
        match self.api.update_content(id, &payload).await {
            Ok(_) => {
                self.resync_contents(None).await;
                self.notifier.success("Content updated");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Content could not be updated: {e}"));
                Err(e)
            }
        }
    }

    /// Delete a content block after confirmation.
    pub async fn delete_content(&mut self, id: &str) -> Result<()> {
        let confirmed = self
            .gate
            .confirm("Delete content", "Permanently delete this content block?")
            .await;
        if !confirmed {
            return Ok(());
        }

        self.store.remove_content(id);
        let result = self.api.delete_content(id).await;
        self.resync_contents(None).await;

        match result {
            Ok(()) => {
                self.notifier.success("Content deleted");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Content could not be deleted: {e}"));
                Err(e)
            }
        }
    }

    // --- Image management (focused content) ---

    /// Focus a loaded content block for image management and fetch its
    /// images. `None` clears the focus.
    pub async fn focus_content(&mut self, content_id: Option<&str>) -> Result<()> {
        let Some(content_id) = content_id else {
            self.store.focus_content(None);
            return Ok(());
        };
        let Some(content) = self
            .store
            .contents
            .iter()
            .find(|c| c.id == content_id)
            .cloned()
        else {
            return Err(AppError::validation(format!(
                "content {content_id} is not loaded"
            )));
        };

        self.store.focus_content(Some(content));
        self.resync_images().await;
        Ok(())
    }

    async fn resync_images(&mut self) {
        let Some(content_id) = self
            .store
            .selection()
            .selected_content
            .as_ref()
            .map(|c| c.id.clone())
        else {
            return;
        };
        let generation = self.store.begin_refresh();
        match self.api.list_images(Some(&content_id)).await {
            Ok(list) => {
                self.store.set_images(generation, list);
            }
            Err(e) => log::warn!("image fetch failed for content {content_id}: {e}"),
        }
    }

    /// Attach a URL-backed image record to a content block.
    pub async fn add_image(
        &mut self,
        content_id: &str,
        url: &str,
        alt: Option<&str>,
        sort_order: Option<i32>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<()> {
        if let Err(e) = validate::image_url(url) {
            self.notifier.error(e.to_string());
            return Err(e);
        }

        let payload = ContentImageCreate {
            content_id: content_id.to_string(),
            url: url.to_string(),
            alt: trimmed_or_none(alt),
            sort_order,
            width,
            height,
        };
        match self.api.create_image(&payload).await {
            Ok(_) => {
                self.resync_images().await;
                self.notifier.success("Image added");
                Ok(())
            }
            Err(e) => {
                self.notifier.error(format!("Image could not be added: {e}"));
                Err(e)
            }
        }
    }

    /// Upload a local file as an image of a content block.
    pub async fn upload_image(
        &mut self,
        content_id: &str,
        path: &Path,
        alt: Option<&str>,
        sort_order: Option<i32>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<()> {
        let image = NewImage {
            source: ImageSource::File(path.to_path_buf()),
            alt: trimmed_or_none(alt),
            sort_order: sort_order.unwrap_or(0),
            width,
            height,
        };
        match self.upload_new_image(content_id, path, &image).await {
            Ok(()) => {
                self.resync_images().await;
                self.notifier.success("Image uploaded");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Image could not be uploaded: {e}"));
                Err(e)
            }
        }
    }

    /// Update an image record (alt text, ordering, display size).
    pub async fn update_image(&mut self, id: &str, payload: &ContentImageUpdate) -> Result<()> {
        match self.api.update_image(id, payload).await {
            Ok(_) => {
                self.resync_images().await;
                self.notifier.success("Image updated");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Image could not be updated: {e}"));
                Err(e)
            }
        }
    }

    /// Delete an image record after confirmation.
    pub async fn delete_image(&mut self, id: &str) -> Result<()> {
        let confirmed = self
            .gate
            .confirm("Delete image", "Remove this image from the content?")
            .await;
        if !confirmed {
            return Ok(());
        }

        self.store.remove_image(id);
        let result = self.api.delete_image(id).await;
        self.resync_images().await;

        match result {
            Ok(()) => {
                self.notifier.success("Image deleted");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Image could not be deleted: {e}"));
                Err(e)
            }
        }
    }

    // --- Admin users ---

    /// Create an admin account. A duplicate email in the loaded list is
    /// rejected locally; a server-side 409 still surfaces as "duplicate".
    pub async fn create_admin(&mut self, email: &str, password: &str) -> Result<()> {
        let checks = validate::email(email)
            .and_then(|_| validate::password(password))
            .and_then(|_| validate::no_duplicate_email(&self.store.admins, email));
        if let Err(e) = checks {
            self.notifier.error(e.to_string());
            return Err(e);
        }

        let payload = AdminCreate {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.create_admin(&payload).await {
            Ok(_) => {
                self.resync_admins().await;
                self.notifier
                    .success(format!("Admin {} created", payload.email));
                Ok(())
            }
            Err(e) if e.is_conflict() => {
                self.notifier
                    .error("An admin with this email already exists");
                Err(e)
            }
            Err(e) => {
                self.notifier
                    .error(format!("Admin could not be created: {e}"));
                Err(e)
            }
        }
    }

    /// Delete an admin account after confirmation.
    pub async fn delete_admin(&mut self, id: &str) -> Result<()> {
        let confirmed = self
            .gate
            .confirm("Delete admin", "Remove this admin account?")
            .await;
        if !confirmed {
            return Ok(());
        }

        self.store.remove_admin(id);
        let result = self.api.delete_admin(id).await;
        self.resync_admins().await;

        match result {
            Ok(()) => {
                self.notifier.success("Admin deleted");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Admin could not be deleted: {e}"));
                Err(e)
            }
        }
    }

    /// Change an admin password through the prompt gate.
    pub async fn change_admin_password(&mut self, id: &str) -> Result<()> {
        let Some(password) = self.gate.prompt("New password", "").await else {
            return Ok(());
        };
        if let Err(e) = validate::password(&password) {
            self.notifier.error(e.to_string());
            return Err(e);
        }

        match self.api.change_password(id, &password).await {
            Ok(()) => {
                self.gate
                    .alert("Password updated", "The password has been changed.")
                    .await;
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(format!("Password could not be changed: {e}"));
                Err(e)
            }
        }
    }
}
