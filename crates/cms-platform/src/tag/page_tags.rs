//! Page tag set persistence

use std::collections::HashSet;

use tracing::debug;

use crate::usecase::{ChangeSet, UseCaseError};

use super::entity::{normalize_tag_name, PageTag, Tag};
use super::repository::TagRepository;

#[derive(Clone)]
pub struct PageTagService {
    tags: TagRepository,
}

impl PageTagService {
    pub fn new(tags: TagRepository) -> Self {
        Self { tags }
    }

    /// Replace the tag set of `page_id` with `names`, creating tags that do
    /// not exist yet. Names are trimmed; blanks and case-insensitive repeats
    /// are dropped. Returns the newly created tags.
    pub async fn save_page_tags(
        &self,
        page_id: &str,
        names: &[String],
        changes: &mut ChangeSet,
    ) -> Result<Vec<Tag>, UseCaseError> {
        let requested = normalize_names(names);
        let requested_keys: HashSet<String> = requested.iter().map(|n| normalize_tag_name(n)).collect();

        let mut links = self
            .tags
            .find_page_tags(page_id)
            .await
            .map_err(|e| UseCaseError::storage("Failed to load page tags", e))?;
        let tag_ids: Vec<String> = links.iter().map(|l| l.tag_id.clone()).collect();
        let linked_tags = self
            .tags
            .find_by_ids(&tag_ids)
            .await
            .map_err(|e| UseCaseError::storage("Failed to load tags", e))?;

        let mut kept: HashSet<String> = HashSet::new();
        for link in links.iter_mut() {
            let key = linked_tags
                .iter()
                .find(|t| t.id == link.tag_id)
                .map(|t| normalize_tag_name(&t.name));
            match key {
                Some(key) if requested_keys.contains(&key) && kept.insert(key.clone()) => {}
                _ => changes.delete(link)?,
            }
        }

        let missing: Vec<String> = requested
            .into_iter()
            .filter(|name| !kept.contains(&normalize_tag_name(name)))
            .collect();
        let existing = self
            .tags
            .find_by_names(&missing)
            .await
            .map_err(|e| UseCaseError::storage("Failed to load tags", e))?;

        let mut created = Vec::new();
        for name in missing {
            let key = normalize_tag_name(&name);
            let tag_id = match existing.iter().find(|t| t.normalized_name == key) {
                Some(tag) => tag.id.clone(),
                None => {
                    let mut tag = Tag::new(name);
                    changes.save(&mut tag)?;
                    let id = tag.id.clone();
                    created.push(tag);
                    id
                }
            };
            changes.save(&mut PageTag::new(page_id, tag_id))?;
        }

        debug!(page_id, created = created.len(), "Staged page tags");
        Ok(created)
    }
}

fn normalize_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(normalize_tag_name(n)))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::entity::Entity;
    use crate::shared::memory_store::InMemoryStore;
    use crate::shared::repository::StoreBackend;
    use crate::usecase::{ExecutionContext, InMemoryUnitOfWork, UnitOfWork};
    use bson::doc;
    use serde::Serialize;

    #[derive(Serialize)]
    struct SaveTags;

    #[test]
    fn test_normalize_names() {
        let names = vec![" News ".to_string(), "news".to_string(), "".to_string(), "Sport".to_string()];
        assert_eq!(normalize_names(&names), vec!["News", "Sport"]);
    }

    #[tokio::test]
    async fn test_replaces_tag_set_and_creates_missing_tags() {
        let store = InMemoryStore::new();
        let backend = StoreBackend::Memory(store.clone());
        let news = Tag::new("news");
        let old = Tag::new("old");
        store.seed(&news).unwrap();
        store.seed(&old).unwrap();
        store.seed(&PageTag::new("P1", &old.id)).unwrap();

        let service = PageTagService::new(TagRepository::new(&backend));
        let ctx = ExecutionContext::create("editor");
        let mut changes = ChangeSet::new(&ctx, "Page", "P1");
        let created = service
            .save_page_tags("P1", &["news".to_string(), "fresh".to_string()], &mut changes)
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "fresh");

        InMemoryUnitOfWork::new(store.clone())
            .commit(changes, &SaveTags)
            .await
            .unwrap();

        let repo = TagRepository::new(&backend);
        let links = repo.find_page_tags("P1").await.unwrap();
        let ids: Vec<String> = links.into_iter().map(|l| l.tag_id).collect();
        let names: Vec<String> = repo.find_by_ids(&ids).await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["fresh", "news"]);
        assert_eq!(store.count(Tag::COLLECTION, &doc! {}), 3);
    }

    #[tokio::test]
    async fn test_existing_tag_is_reused_regardless_of_case() {
        let store = InMemoryStore::new();
        let backend = StoreBackend::Memory(store.clone());
        let news = Tag::new("News");
        store.seed(&news).unwrap();

        let service = PageTagService::new(TagRepository::new(&backend));
        let ctx = ExecutionContext::create("editor");
        let mut changes = ChangeSet::new(&ctx, "Page", "P1");
        let created = service
            .save_page_tags("P1", &["news".to_string()], &mut changes)
            .await
            .unwrap();
        assert!(created.is_empty());

        InMemoryUnitOfWork::new(store.clone())
            .commit(changes, &SaveTags)
            .await
            .unwrap();

        let links = TagRepository::new(&backend).find_page_tags("P1").await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].tag_id, news.id);
        assert_eq!(store.count(Tag::COLLECTION, &doc! {}), 1);
    }
}
