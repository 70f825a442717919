//! CMS Platform
//!
//! Service layer of a content management system:
//! - Page properties read, upsert and cascading delete
//! - Tags and page tag sets
//! - Master page chains, layouts and merged page options
//! - Sitemap node unlinking with archival snapshots
//! - Blog default template options
//! - Use Case pattern with atomic commits and audit logging
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` / `service` - Data access and domain rules
//! - `api` - REST endpoints
//! - `events` - Domain events published after commit

// Content aggregates
pub mod page;
pub mod master_page;
pub mod layout;
pub mod content;
pub mod category;
pub mod language;
pub mod media;
pub mod tag;
pub mod sitemap;
pub mod blog;

// Domain services
pub mod access;
pub mod option;
pub mod url;

pub mod audit;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod usecase;

use std::sync::Arc;

use axum::Router;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};
pub use shared::event_publisher::{ChannelEventPublisher, EventEnvelope, EventPublisher, RecordingEventPublisher};
pub use shared::memory_store::InMemoryStore;
pub use shared::repository::{Repository, StoreBackend};
pub use shared::tsid::TsidGenerator;

// Re-export use case infrastructure
pub use usecase::{
    ChangeSet, DomainEvent, ExecutionContext, InMemoryUnitOfWork, MongoUnitOfWork, UnitOfWork,
    UseCaseError, UseCaseResult,
};

// Re-export main entity types for convenience
pub use access::{AccessLevel, AccessRule};
pub use blog::BlogOption;
pub use category::Category;
pub use content::{Content, ContentKind, ContentStatus, PageContent};
pub use language::Language;
pub use layout::{Layout, LayoutRegion, Region};
pub use master_page::MasterPage;
pub use media::{MediaImage, MediaUrlResolver};
pub use option::{OptionType, OptionValue};
pub use page::{Page, PageStatus};
pub use sitemap::{Sitemap, SitemapArchive, SitemapNode};
pub use tag::{PageTag, Tag};

use blog::{blog_options_router, BlogOptionService, BlogOptionsState};
use page::properties::{DeletePagePropertiesUseCase, GetPagePropertiesUseCase, PutPagePropertiesUseCase};
use page::{pages_router, PagesState};
use tag::{tags_router, TagRepository, TagService, TagsState};

/// Wires repositories, use cases and routers over one storage backend.
pub struct CmsPlatform<U: UnitOfWork> {
    backend: StoreBackend,
    unit_of_work: Arc<U>,
    publisher: Arc<dyn EventPublisher>,
    media: MediaUrlResolver,
}

impl<U: UnitOfWork + 'static> CmsPlatform<U> {
    pub fn new(
        backend: StoreBackend,
        unit_of_work: Arc<U>,
        publisher: Arc<dyn EventPublisher>,
        media: MediaUrlResolver,
    ) -> Self {
        Self {
            backend,
            unit_of_work,
            publisher,
            media,
        }
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    pub fn pages_state(&self) -> PagesState<U> {
        PagesState {
            get_properties: Arc::new(GetPagePropertiesUseCase::new(&self.backend, self.media.clone())),
            put_properties: Arc::new(PutPagePropertiesUseCase::new(
                &self.backend,
                self.unit_of_work.clone(),
                self.publisher.clone(),
            )),
            delete_properties: Arc::new(DeletePagePropertiesUseCase::new(
                &self.backend,
                self.unit_of_work.clone(),
                self.publisher.clone(),
            )),
        }
    }

    pub fn tags_state(&self) -> TagsState {
        TagsState {
            tag_service: TagService::new(TagRepository::new(&self.backend)),
        }
    }

    pub fn blog_options_state(&self) -> BlogOptionsState<U> {
        BlogOptionsState {
            blog_options: Arc::new(BlogOptionService::new(&self.backend, self.unit_of_work.clone())),
        }
    }

    /// `/api/pages`, `/api/tags` and `/blog/options`.
    pub fn router(&self) -> Router {
        Router::new()
            .nest("/api/pages", pages_router(self.pages_state()))
            .nest("/api/tags", tags_router(self.tags_state()))
            .nest("/blog/options", blog_options_router(self.blog_options_state()))
    }
}

impl CmsPlatform<InMemoryUnitOfWork> {
    /// Platform over the in-process store.
    pub fn in_memory(store: InMemoryStore, publisher: Arc<dyn EventPublisher>, media: MediaUrlResolver) -> Self {
        Self::new(
            StoreBackend::Memory(store.clone()),
            Arc::new(InMemoryUnitOfWork::new(store)),
            publisher,
            media,
        )
    }
}
