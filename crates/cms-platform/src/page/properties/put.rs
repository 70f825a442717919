//! Put Page Properties Use Case

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::access::AccessControlService;
use crate::category::Category;
use crate::details;
use crate::language::Language;
use crate::layout::Layout;
use crate::master_page::{MasterPagePlan, MasterPageService};
use crate::media::MediaImage;
use crate::page::events::{PageCreated, PagePropertiesChanged};
use crate::page::{Page, PageRepository, PageStatus};
use crate::shared::entity::{non_empty, Entity};
use crate::shared::error::PlatformError;
use crate::shared::event_publisher::{publish_or_warn, EventPublisher};
use crate::shared::repository::{Repository, StoreBackend};
use crate::shared::tsid::TsidGenerator;
use crate::tag::{PageTagService, Tag, TagCreated, TagRepository};
use crate::url::UrlService;
use crate::usecase::{ChangeSet, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

use super::models::{PutPagePropertiesCommand, PutPagePropertiesResponse};

fn read_failed(err: PlatformError) -> UseCaseError {
    UseCaseError::storage("Failed to load page references", err)
}

/// Audit record of the descendant link rewrite that follows a master change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PropagateMasterPagesCommand<'a> {
    page_id: &'a str,
    child_page_ids: &'a [String],
}

/// Creates or replaces a page's properties.
pub struct PutPagePropertiesUseCase<U: UnitOfWork> {
    pages: PageRepository,
    layouts: Repository<Layout>,
    categories: Repository<Category>,
    languages: Repository<Language>,
    images: Repository<MediaImage>,
    master_pages: MasterPageService,
    page_tags: PageTagService,
    access: AccessControlService,
    urls: UrlService,
    unit_of_work: Arc<U>,
    publisher: Arc<dyn EventPublisher>,
}

impl<U: UnitOfWork> PutPagePropertiesUseCase<U> {
    pub fn new(backend: &StoreBackend, unit_of_work: Arc<U>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            pages: PageRepository::new(backend),
            layouts: Repository::new(backend),
            categories: Repository::new(backend),
            languages: Repository::new(backend),
            images: Repository::new(backend),
            master_pages: MasterPageService::new(backend),
            page_tags: PageTagService::new(TagRepository::new(backend)),
            access: AccessControlService::new(),
            urls: UrlService::new(),
            unit_of_work,
            publisher,
        }
    }

    pub async fn execute(
        &self,
        command: PutPagePropertiesCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PutPagePropertiesResponse> {
        if command.page_url.trim().is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "PAGE_URL_REQUIRED",
                "Page URL is required",
            ));
        }

        let (mut page, is_new) = match self.load_page(&command).await {
            Ok(loaded) => loaded,
            Err(err) => return UseCaseResult::failure(err),
        };

        let mut plan = match self.check_references(&page, &command).await {
            Ok(plan) => plan,
            Err(err) => return UseCaseResult::failure(err),
        };

        let mut changes = ChangeSet::new(&ctx, Page::ENTITY_TYPE, page.id.clone());
        let new_tags = match self.stage_page(&mut page, &command, &mut plan, &mut changes).await {
            Ok(tags) => tags,
            Err(err) => return UseCaseResult::failure(err),
        };

        if let Err(err) = self.unit_of_work.commit(changes, &command).await.into_result() {
            return UseCaseResult::failure(err);
        }

        // descendants are rewritten in their own commit; the page change
        // above stays durable even if this one fails
        let propagation = self.propagate_to_children(&page, &mut plan, &ctx).await;

        for tag in &new_tags {
            publish_or_warn(self.publisher.as_ref(), &TagCreated::new(&ctx, tag));
        }
        if is_new {
            publish_or_warn(self.publisher.as_ref(), &PageCreated::new(&ctx, &page));
        } else {
            publish_or_warn(self.publisher.as_ref(), &PagePropertiesChanged::new(&ctx, &page));
        }

        if let Err(err) = propagation {
            warn!(page_id = %page.id, error = %err.message(), "Master page propagation failed");
            return UseCaseResult::failure(err);
        }

        info!(page_id = %page.id, version = page.audit.version, created = is_new, "Page properties saved");
        UseCaseResult::success(PutPagePropertiesResponse {
            id: page.id,
            version: page.audit.version,
        })
    }

    /// Stored page with the caller's version checked, or a fresh one.
    async fn load_page(&self, command: &PutPagePropertiesCommand) -> Result<(Page, bool), UseCaseError> {
        let existing = match non_empty(Some(command.id.as_str())) {
            Some(id) => self.pages.find_by_id(id).await.map_err(read_failed)?,
            None => None,
        };

        match existing {
            Some(page) if page.is_deleted() => Err(UseCaseError::business_rule(
                "PAGE_DELETED",
                format!("Page '{}' has been deleted", page.id),
            )),
            Some(page) if command.version != Some(page.audit.version) => {
                Err(UseCaseError::concurrency_with_details(
                    "PAGE_VERSION_CONFLICT",
                    "Page was modified by another user",
                    details! { "id" => page.id, "version" => page.audit.version },
                ))
            }
            Some(page) => Ok((page, false)),
            None => {
                let id = match non_empty(Some(command.id.as_str())) {
                    Some(id) => id.to_string(),
                    None => TsidGenerator::generate(),
                };
                Ok((Page::new(id), true))
            }
        }
    }

    /// Every referenced record must exist; the master chain must not loop.
    async fn check_references(
        &self,
        page: &Page,
        command: &PutPagePropertiesCommand,
    ) -> Result<MasterPagePlan, UseCaseError> {
        let master_id = non_empty(command.master_page_id.as_deref());
        match master_id {
            Some(master_id) => {
                if master_id == page.id {
                    return Err(UseCaseError::validation(
                        "MASTER_PAGE_CYCLE",
                        "A page cannot be its own master page",
                    ));
                }
                let master = self.pages.find_active_by_id(master_id).await.map_err(read_failed)?;
                require(master, "MASTER_PAGE_NOT_FOUND", "Master page", master_id)?;
            }
            None => {
                if let Some(layout_id) = non_empty(command.layout_id.as_deref()) {
                    ensure_live(&self.layouts, layout_id, "LAYOUT_NOT_FOUND").await?;
                }
            }
        }

        if let Some(id) = non_empty(command.category_id.as_deref()) {
            ensure_live(&self.categories, id, "CATEGORY_NOT_FOUND").await?;
        }
        if let Some(id) = non_empty(command.language_id.as_deref()) {
            ensure_live(&self.languages, id, "LANGUAGE_NOT_FOUND").await?;
        }
        for image_id in [
            &command.main_image_id,
            &command.featured_image_id,
            &command.secondary_image_id,
        ] {
            if let Some(id) = non_empty(image_id.as_deref()) {
                ensure_live(&self.images, id, "IMAGE_NOT_FOUND").await?;
            }
        }

        let plan = self
            .master_pages
            .prepare(&page.id, master_id)
            .await
            .map_err(read_failed)?;
        if plan.new_master_ids.contains(&page.id) {
            return Err(UseCaseError::validation(
                "MASTER_PAGE_CYCLE",
                "The master page already uses this page as a master",
            ));
        }
        Ok(plan)
    }

    /// Apply the command to `page` and stage every write. Returns the tags
    /// created along the way.
    async fn stage_page(
        &self,
        page: &mut Page,
        command: &PutPagePropertiesCommand,
        plan: &mut MasterPagePlan,
        changes: &mut ChangeSet,
    ) -> Result<Vec<Tag>, UseCaseError> {
        page.page_url = self.urls.fix_url(&command.page_url);
        page.page_url_hash = self.urls.url_hash(&page.page_url);
        page.title = command.title.clone();
        page.description = command.description.clone();
        page.status = if command.is_master_page || command.is_published {
            PageStatus::Published
        } else {
            PageStatus::Unpublished
        };
        page.published_on = command.published_on;

        self.master_pages.set_master_or_layout(
            page,
            command.master_page_id.as_deref(),
            command.layout_id.as_deref(),
            plan,
            changes,
        )?;

        page.category_id = non_empty(command.category_id.as_deref()).map(String::from);
        page.is_archived = command.is_archived;
        page.is_master_page = command.is_master_page;
        page.language_group_identifier = non_empty(command.language_group_identifier.as_deref()).map(String::from);
        page.language_id = non_empty(command.language_id.as_deref()).map(String::from);
        page.main_image_id = non_empty(command.main_image_id.as_deref()).map(String::from);
        page.featured_image_id = non_empty(command.featured_image_id.as_deref()).map(String::from);
        page.secondary_image_id = non_empty(command.secondary_image_id.as_deref()).map(String::from);
        page.custom_css = command.custom_css.clone();
        page.custom_js = command.custom_java_script.clone();
        page.use_canonical_url = command.use_canonical_url;
        page.use_no_follow = command.use_no_follow;
        page.use_no_index = command.use_no_index;

        if let Some(meta) = &command.meta_data {
            page.meta_title = meta.meta_title.clone();
            page.meta_description = meta.meta_description.clone();
            page.meta_keywords = meta.meta_keywords.clone();
        }

        let new_tags = match &command.tags {
            Some(names) => self.page_tags.save_page_tags(&page.id, names, changes).await?,
            None => Vec::new(),
        };

        if let Some(requested) = &command.access_rules {
            self.access.remove_duplicates(&mut page.access_rules);
            self.access.update_access(&mut page.access_rules, requested);
        }

        changes.save(page)?;
        Ok(new_tags)
    }

    async fn propagate_to_children(
        &self,
        page: &Page,
        plan: &mut MasterPagePlan,
        ctx: &ExecutionContext,
    ) -> Result<(), UseCaseError> {
        if !plan.changes_ancestry() || plan.child_page_ids.is_empty() {
            return Ok(());
        }

        let mut changes = ChangeSet::new(ctx, Page::ENTITY_TYPE, page.id.clone());
        let staged = self.master_pages.stage_children_update(plan, &mut changes)?;
        if staged == 0 {
            return Ok(());
        }

        let command = PropagateMasterPagesCommand {
            page_id: &page.id,
            child_page_ids: &plan.child_page_ids,
        };
        self.unit_of_work.commit(changes, &command).await.into_result()?;
        info!(page_id = %page.id, children = plan.child_page_ids.len(), "Propagated master pages");
        Ok(())
    }
}

async fn ensure_live<T: Entity>(repo: &Repository<T>, id: &str, code: &str) -> Result<(), UseCaseError> {
    let found = repo.find_active_by_id(id).await.map_err(read_failed)?;
    require(found, code, T::ENTITY_TYPE, id).map(|_| ())
}

fn require<T>(found: Option<T>, code: &str, kind: &str, id: &str) -> Result<T, UseCaseError> {
    found.ok_or_else(|| {
        UseCaseError::not_found_with_details(
            code,
            format!("{} '{}' not found", kind, id),
            details! { "id" => id },
        )
    })
}
