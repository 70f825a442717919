//! Page Repository

use bson::doc;

use crate::shared::entity::active;
use crate::shared::error::Result;
use crate::shared::repository::{Repository, StoreBackend};

use super::entity::Page;

#[derive(Clone)]
pub struct PageRepository {
    pages: Repository<Page>,
}

impl PageRepository {
    pub fn new(backend: &StoreBackend) -> Self {
        Self {
            pages: Repository::new(backend),
        }
    }

    /// Includes soft-deleted pages.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Page>> {
        self.pages.find_by_id(id).await
    }

    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<Page>> {
        self.pages.find_active_by_id(id).await
    }

    pub async fn find_by_url_hash(&self, url_hash: &str) -> Result<Vec<Page>> {
        self.pages
            .find_sorted(active(doc! { "pageUrlHash": url_hash }), Some(doc! { "_id": 1 }))
            .await
    }

    /// Translations sharing a language group, ordered by title.
    pub async fn find_by_language_group(&self, group: &str) -> Result<Vec<Page>> {
        self.pages
            .find_sorted(
                active(doc! { "languageGroupIdentifier": group }),
                Some(doc! { "title": 1 }),
            )
            .await
    }

    pub async fn find_master_pages(&self) -> Result<Vec<Page>> {
        self.pages
            .find_sorted(active(doc! { "isMasterPage": true }), Some(doc! { "title": 1 }))
            .await
    }
}
