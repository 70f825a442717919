//! Sitemap service

use std::collections::BTreeSet;

use bson::doc;
use tracing::debug;

use crate::page::Page;
use crate::shared::entity::{active, Audit};
use crate::shared::error::Result;
use crate::shared::repository::{Repository, StoreBackend};
use crate::shared::tsid::TsidGenerator;
use crate::usecase::{ChangeSet, UseCaseError};

use super::entity::{ArchivedNode, Sitemap, SitemapArchive, SitemapNode};

#[derive(Clone)]
pub struct SitemapService {
    sitemaps: Repository<Sitemap>,
    nodes: Repository<SitemapNode>,
}

impl SitemapService {
    pub fn new(backend: &StoreBackend) -> Self {
        Self {
            sitemaps: Repository::new(backend),
            nodes: Repository::new(backend),
        }
    }

    /// Every node bound to the page, soft-deleted ones included.
    pub async fn nodes_by_page(&self, page_id: &str) -> Result<Vec<SitemapNode>> {
        self.nodes
            .find_sorted(doc! { "pageId": page_id }, Some(doc! { "displayOrder": 1, "_id": 1 }))
            .await
    }

    /// Distinct non-deleted sitemaps owning the given nodes.
    pub async fn sitemaps_of(&self, nodes: &[SitemapNode]) -> Result<Vec<Sitemap>> {
        let ids: BTreeSet<String> = nodes.iter().map(|n| n.sitemap_id.clone()).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = ids.into_iter().collect();
        self.sitemaps
            .find_sorted(active(doc! { "_id": { "$in": ids } }), Some(doc! { "_id": 1 }))
            .await
    }

    /// Stage a snapshot of the sitemap and its current nodes.
    pub async fn archive(
        &self,
        sitemap: &Sitemap,
        reason: &str,
        changes: &mut ChangeSet,
    ) -> std::result::Result<(), UseCaseError> {
        let nodes = self
            .nodes
            .find_sorted(
                active(doc! { "sitemapId": sitemap.id.as_str() }),
                Some(doc! { "displayOrder": 1, "_id": 1 }),
            )
            .await
            .map_err(|e| UseCaseError::storage("Failed to load sitemap nodes", e))?;

        let mut archive = SitemapArchive {
            id: TsidGenerator::generate(),
            sitemap_id: sitemap.id.clone(),
            title: sitemap.title.clone(),
            reason: reason.to_string(),
            nodes: nodes.iter().map(ArchivedNode::from).collect(),
            audit: Audit::new(),
        };
        debug!(sitemap_id = %sitemap.id, nodes = archive.nodes.len(), "Archiving sitemap");
        changes.save(&mut archive)
    }

    /// Drop the node's page reference. The node keeps pointing at the page's
    /// address and, when it mirrors the page title, at its title.
    pub fn unlink(
        &self,
        node: &mut SitemapNode,
        page: &Page,
        changes: &mut ChangeSet,
    ) -> std::result::Result<(), UseCaseError> {
        node.page_id = None;
        if node.use_page_title_as_node_title {
            node.title = page.title.clone();
        }
        node.url = page.page_url.clone();
        node.url_hash = page.page_url_hash.clone();
        changes.save(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::entity::Entity;
    use crate::shared::memory_store::InMemoryStore;
    use crate::usecase::ExecutionContext;

    fn page() -> Page {
        let mut page = Page::new("P1");
        page.title = "About".into();
        page.page_url = "/about/".into();
        page.page_url_hash = "hash".into();
        page
    }

    #[test]
    fn test_unlink_node_mirrors_page() {
        let service = SitemapService::new(&StoreBackend::Memory(InMemoryStore::new()));
        let mut changes = ChangeSet::new(&ExecutionContext::create("editor"), "Page", "P1");

        let mut mirrored = SitemapNode::new("S1", "Old", "/old/").for_page("P1", true);
        let mut fixed = SitemapNode::new("S1", "Keep", "/old/").for_page("P1", false);
        service.unlink(&mut mirrored, &page(), &mut changes).unwrap();
        service.unlink(&mut fixed, &page(), &mut changes).unwrap();

        assert_eq!(mirrored.page_id, None);
        assert_eq!(mirrored.title, "About");
        assert_eq!(mirrored.url, "/about/");
        assert_eq!(fixed.title, "Keep");
        assert_eq!(fixed.url_hash, "hash");
        assert_eq!(changes.len(), 2);
    }

    #[tokio::test]
    async fn test_sitemaps_of_nodes() {
        let store = InMemoryStore::new();
        let first = Sitemap::new("Main");
        let second = Sitemap::new("Footer");
        store.seed(&first).unwrap();
        store.seed(&second).unwrap();

        let live = SitemapNode::new(&first.id, "a", "/a/").for_page("P1", false);
        let mut dead = SitemapNode::new(&second.id, "b", "/b/").for_page("P1", false);
        dead.audit.is_deleted = true;
        store.seed(&live).unwrap();
        store.seed(&dead).unwrap();

        let service = SitemapService::new(&StoreBackend::Memory(store));
        let nodes = service.nodes_by_page("P1").await.unwrap();
        assert_eq!(nodes.len(), 2);
        let live: Vec<SitemapNode> = nodes.iter().filter(|n| !n.is_deleted()).cloned().collect();
        let sitemaps = service.sitemaps_of(&live).await.unwrap();
        assert_eq!(sitemaps.len(), 1);
        assert_eq!(sitemaps[0].id, first.id);
        assert_eq!(service.sitemaps_of(&nodes).await.unwrap().len(), 2);
    }
}
