//! Tag Repository

use bson::doc;

use crate::shared::entity::active;
use crate::shared::error::Result;
use crate::shared::repository::{Repository, StoreBackend};

use super::entity::{normalize_tag_name, PageTag, Tag};

#[derive(Clone)]
pub struct TagRepository {
    tags: Repository<Tag>,
    page_tags: Repository<PageTag>,
}

impl TagRepository {
    pub fn new(backend: &StoreBackend) -> Self {
        Self {
            tags: Repository::new(backend),
            page_tags: Repository::new(backend),
        }
    }

    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<Tag>> {
        self.tags.find_active_by_id(id).await
    }

    /// Oldest non-deleted tag with this name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tags = self
            .tags
            .find_sorted(
                active(doc! { "normalizedName": normalize_tag_name(name) }),
                Some(doc! { "_id": 1 }),
            )
            .await?;
        Ok(tags.into_iter().next())
    }

    /// Non-deleted tags whose names match any of `names`, ignoring case.
    pub async fn find_by_names(&self, names: &[String]) -> Result<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = names.iter().map(|n| normalize_tag_name(n)).collect();
        self.tags
            .find_sorted(active(doc! { "normalizedName": { "$in": keys } }), Some(doc! { "_id": 1 }))
            .await
    }

    /// Non-deleted tags with the given ids, ordered by name.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.tags
            .find_sorted(active(doc! { "_id": { "$in": ids.to_vec() } }), Some(doc! { "name": 1 }))
            .await
    }

    /// Non-deleted tag links of a page.
    pub async fn find_page_tags(&self, page_id: &str) -> Result<Vec<PageTag>> {
        self.page_tags.find(active(doc! { "pageId": page_id })).await
    }
}
