//! Delete Page Properties Use Case

use std::sync::Arc;

use bson::doc;
use tracing::info;

use crate::content::PageContent;
use crate::details;
use crate::master_page::MasterPageService;
use crate::page::events::PageDeleted;
use crate::page::{Page, PageRepository};
use crate::shared::entity::{active, non_empty, Entity};
use crate::shared::error::PlatformError;
use crate::shared::event_publisher::{publish_or_warn, EventPublisher};
use crate::shared::repository::{Repository, StoreBackend};
use crate::sitemap::{Sitemap, SitemapNode, SitemapNodeUpdated, SitemapService, SitemapUpdated};
use crate::tag::TagRepository;
use crate::usecase::{ChangeSet, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

use super::models::DeletePagePropertiesCommand;

const ARCHIVE_REASON: &str = "page-deleted";

fn read_failed(err: PlatformError) -> UseCaseError {
    UseCaseError::storage("Failed to load page for deletion", err)
}

/// Soft-deletes a page with its tags, contents and master links, and
/// unlinks the sitemap nodes pointing at it.
pub struct DeletePagePropertiesUseCase<U: UnitOfWork> {
    pages: PageRepository,
    page_contents: Repository<PageContent>,
    tags: TagRepository,
    master_pages: MasterPageService,
    sitemaps: SitemapService,
    unit_of_work: Arc<U>,
    publisher: Arc<dyn EventPublisher>,
}

impl<U: UnitOfWork> DeletePagePropertiesUseCase<U> {
    pub fn new(backend: &StoreBackend, unit_of_work: Arc<U>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            pages: PageRepository::new(backend),
            page_contents: Repository::new(backend),
            tags: TagRepository::new(backend),
            master_pages: MasterPageService::new(backend),
            sitemaps: SitemapService::new(backend),
            unit_of_work,
            publisher,
        }
    }

    /// `false` when no page id was given.
    pub async fn execute(&self, command: DeletePagePropertiesCommand, ctx: ExecutionContext) -> UseCaseResult<bool> {
        let Some(page_id) = non_empty(Some(command.id.as_str())) else {
            return UseCaseResult::success(false);
        };

        let mut page = match self.pages.find_by_id(page_id).await {
            Ok(Some(page)) if !page.is_deleted() => page,
            Ok(_) => {
                return UseCaseResult::failure(UseCaseError::not_found_with_details(
                    "PAGE_NOT_FOUND",
                    format!("Page '{}' not found", page_id),
                    details! { "id" => page_id },
                ))
            }
            Err(e) => return UseCaseResult::failure(read_failed(e)),
        };

        if command.version != Some(page.audit.version) {
            return UseCaseResult::failure(UseCaseError::concurrency_with_details(
                "PAGE_VERSION_CONFLICT",
                "Page was modified by another user",
                details! { "id" => page.id, "version" => page.audit.version },
            ));
        }

        let mut changes = ChangeSet::new(&ctx, Page::ENTITY_TYPE, page.id.clone());
        let unlinked = match self.stage_delete(&mut page, &mut changes).await {
            Ok(unlinked) => unlinked,
            Err(err) => return UseCaseResult::failure(err),
        };

        if let Err(err) = self.unit_of_work.commit(changes, &command).await.into_result() {
            return UseCaseResult::failure(err);
        }

        for node in &unlinked.updated {
            publish_or_warn(self.publisher.as_ref(), &SitemapNodeUpdated::new(&ctx, node));
        }
        for sitemap in &unlinked.sitemaps {
            publish_or_warn(self.publisher.as_ref(), &SitemapUpdated::new(&ctx, sitemap));
        }
        publish_or_warn(self.publisher.as_ref(), &PageDeleted::new(&ctx, &page));

        info!(page_id = %page.id, updated_nodes = unlinked.updated.len(), "Page deleted");
        UseCaseResult::success(true)
    }

    async fn stage_delete(&self, page: &mut Page, changes: &mut ChangeSet) -> Result<UnlinkedNodes, UseCaseError> {
        // soft-deleted nodes keep their page reference untouched
        let live: Vec<SitemapNode> = self
            .sitemaps
            .nodes_by_page(&page.id)
            .await
            .map_err(read_failed)?
            .into_iter()
            .filter(|n| !n.is_deleted())
            .collect();

        // snapshot before any node is rewritten
        for sitemap in self.sitemaps.sitemaps_of(&live).await.map_err(read_failed)? {
            self.sitemaps.archive(&sitemap, ARCHIVE_REASON, changes).await?;
        }

        let mut unlinked = UnlinkedNodes::default();
        for mut node in live {
            self.sitemaps.unlink(&mut node, page, changes)?;
            unlinked.updated.push(node);
        }
        unlinked.sitemaps = self.sitemaps.sitemaps_of(&unlinked.updated).await.map_err(read_failed)?;

        for mut link in self.tags.find_page_tags(&page.id).await.map_err(read_failed)? {
            changes.delete(&mut link)?;
        }
        let placements = self
            .page_contents
            .find(active(doc! { "pageId": page.id.as_str() }))
            .await
            .map_err(read_failed)?;
        for mut placement in placements {
            changes.delete(&mut placement)?;
        }
        for mut link in self.master_pages.links_of_page(&page.id).await.map_err(read_failed)? {
            changes.delete(&mut link)?;
        }

        page.options.clear();
        page.access_rules.clear();
        changes.delete(page)?;

        Ok(unlinked)
    }
}

#[derive(Default)]
struct UnlinkedNodes {
    updated: Vec<SitemapNode>,
    sitemaps: Vec<Sitemap>,
}
