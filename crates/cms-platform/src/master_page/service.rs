//! Master page service
//!
//! Keeps the per-ancestor link rows in step when a page switches master
//! page or layout, for the page itself and for every page below it.

use std::collections::{BTreeSet, HashSet};

use bson::doc;

use crate::page::{Page, PageRepository};
use crate::shared::entity::{active, non_empty};
use crate::shared::error::Result;
use crate::shared::repository::{Repository, StoreBackend};
use crate::usecase::{ChangeSet, UseCaseError};

use super::entity::MasterPage;

/// Master chain linkage captured before a page's master changes.
#[derive(Debug, Clone, Default)]
pub struct MasterPagePlan {
    pub page_id: String,
    /// Ancestors the page links to now
    pub old_master_ids: BTreeSet<String>,
    /// Ancestors after the change: the new master and its own ancestors
    pub new_master_ids: BTreeSet<String>,
    pub own_links: Vec<MasterPage>,
    /// Pages that have this page in their chain
    pub child_page_ids: Vec<String>,
    pub child_links: Vec<MasterPage>,
}

impl MasterPagePlan {
    pub fn changes_ancestry(&self) -> bool {
        self.old_master_ids != self.new_master_ids
    }
}

#[derive(Clone)]
pub struct MasterPageService {
    pages: PageRepository,
    links: Repository<MasterPage>,
}

impl MasterPageService {
    pub fn new(backend: &StoreBackend) -> Self {
        Self {
            pages: PageRepository::new(backend),
            links: Repository::new(backend),
        }
    }

    pub async fn links_of_page(&self, page_id: &str) -> Result<Vec<MasterPage>> {
        self.links.find(active(doc! { "pageId": page_id })).await
    }

    pub async fn links_to_master(&self, master_id: &str) -> Result<Vec<MasterPage>> {
        self.links.find(active(doc! { "masterId": master_id })).await
    }

    /// Snapshot old and new ancestry plus the descendants' links.
    pub async fn prepare(&self, page_id: &str, new_master_id: Option<&str>) -> Result<MasterPagePlan> {
        let own_links = self.links_of_page(page_id).await?;
        let old_master_ids = own_links.iter().map(|l| l.master_id.clone()).collect();

        let mut new_master_ids = BTreeSet::new();
        if let Some(master_id) = non_empty(new_master_id) {
            for link in self.links_of_page(master_id).await? {
                new_master_ids.insert(link.master_id);
            }
            new_master_ids.insert(master_id.to_string());
        }

        let child_page_ids: Vec<String> = self
            .links_to_master(page_id)
            .await?
            .into_iter()
            .map(|l| l.page_id)
            .collect();

        let child_links = if child_page_ids.is_empty() {
            Vec::new()
        } else {
            self.links
                .find(active(doc! { "pageId": { "$in": child_page_ids.clone() } }))
                .await?
        };

        Ok(MasterPagePlan {
            page_id: page_id.to_string(),
            old_master_ids,
            new_master_ids,
            own_links,
            child_page_ids,
            child_links,
        })
    }

    /// A master page wins and clears the layout; otherwise the layout is set
    /// and every master link of the page is removed.
    pub fn set_master_or_layout(
        &self,
        page: &mut Page,
        master_page_id: Option<&str>,
        layout_id: Option<&str>,
        plan: &mut MasterPagePlan,
        changes: &mut ChangeSet,
    ) -> std::result::Result<(), UseCaseError> {
        match non_empty(master_page_id) {
            Some(master_id) => {
                page.master_page_id = Some(master_id.to_string());
                page.layout_id = None;

                for link in plan.own_links.iter_mut() {
                    if !plan.new_master_ids.contains(&link.master_id) {
                        changes.delete(link)?;
                    }
                }
                for master_id in plan.new_master_ids.difference(&plan.old_master_ids) {
                    changes.save(&mut MasterPage::new(&page.id, master_id))?;
                }
            }
            None => {
                page.layout_id = non_empty(layout_id).map(String::from);
                page.master_page_id = None;

                for link in plan.own_links.iter_mut() {
                    changes.delete(link)?;
                }
            }
        }
        Ok(())
    }

    /// Move descendants from the old ancestry to the new one. Returns the
    /// number of staged writes.
    pub fn stage_children_update(
        &self,
        plan: &mut MasterPagePlan,
        changes: &mut ChangeSet,
    ) -> std::result::Result<usize, UseCaseError> {
        if !plan.changes_ancestry() {
            return Ok(0);
        }

        let before = changes.len();
        let removed: BTreeSet<String> = plan
            .old_master_ids
            .difference(&plan.new_master_ids)
            .cloned()
            .collect();
        let added: Vec<String> = plan
            .new_master_ids
            .difference(&plan.old_master_ids)
            .cloned()
            .collect();

        for child_id in &plan.child_page_ids {
            let mut linked: HashSet<String> = HashSet::new();
            for link in plan.child_links.iter_mut().filter(|l| &l.page_id == child_id) {
                if removed.contains(&link.master_id) {
                    changes.delete(link)?;
                } else {
                    linked.insert(link.master_id.clone());
                }
            }
            for master_id in added.iter().filter(|m| !linked.contains(*m)) {
                changes.save(&mut MasterPage::new(child_id, master_id))?;
            }
        }

        Ok(changes.len() - before)
    }

    /// Master pages above `page`, root first.
    pub async fn master_chain(&self, page: &Page) -> Result<Vec<Page>> {
        let mut chain = Vec::new();
        let mut visited: HashSet<String> = HashSet::from([page.id.clone()]);
        let mut next = page.master_page_id.clone();

        while let Some(master_id) = next {
            if !visited.insert(master_id.clone()) {
                break;
            }
            match self.pages.find_active_by_id(&master_id).await? {
                Some(master) => {
                    next = master.master_page_id.clone();
                    chain.push(master);
                }
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::memory_store::InMemoryStore;
    use crate::usecase::ExecutionContext;

    fn service_with(store: &InMemoryStore) -> MasterPageService {
        MasterPageService::new(&StoreBackend::Memory(store.clone()))
    }

    fn seed_link(store: &InMemoryStore, page: &str, master: &str) {
        store.seed(&MasterPage::new(page, master)).unwrap();
    }

    #[tokio::test]
    async fn test_prepare_collects_ancestry_and_children() {
        let store = InMemoryStore::new();
        // root <- mid <- page <- child
        seed_link(&store, "mid", "root");
        seed_link(&store, "page", "mid");
        seed_link(&store, "page", "root");
        seed_link(&store, "child", "page");
        seed_link(&store, "child", "mid");
        seed_link(&store, "child", "root");
        seed_link(&store, "other", "root");

        let plan = service_with(&store).prepare("page", Some("other")).await.unwrap();

        assert_eq!(plan.old_master_ids, BTreeSet::from(["mid".to_string(), "root".to_string()]));
        assert_eq!(plan.new_master_ids, BTreeSet::from(["other".to_string(), "root".to_string()]));
        assert_eq!(plan.child_page_ids, vec!["child".to_string()]);
        assert_eq!(plan.child_links.len(), 3);
    }

    #[tokio::test]
    async fn test_children_follow_new_ancestry() {
        let store = InMemoryStore::new();
        seed_link(&store, "page", "mid");
        seed_link(&store, "child", "page");
        seed_link(&store, "child", "mid");

        let service = service_with(&store);
        let mut plan = service.prepare("page", Some("other")).await.unwrap();

        let ctx = ExecutionContext::create("editor");
        let mut changes = ChangeSet::new(&ctx, "Page", "page");
        let staged = service.stage_children_update(&mut plan, &mut changes).unwrap();

        // child drops "mid", gains "other"
        assert_eq!(staged, 2);
        let deleted = changes
            .writes()
            .iter()
            .filter(|w| w.document.get_document("audit").unwrap().get_bool("isDeleted").unwrap())
            .count();
        assert_eq!(deleted, 1);
    }

    #[test]
    fn test_layout_clears_master() {
        let store = InMemoryStore::new();
        let service = service_with(&store);
        let ctx = ExecutionContext::create("editor");
        let mut changes = ChangeSet::new(&ctx, "Page", "p");
        let mut page = Page::new("p");
        page.master_page_id = Some("m".into());
        let mut plan = MasterPagePlan::default();

        service
            .set_master_or_layout(&mut page, None, Some("L1"), &mut plan, &mut changes)
            .unwrap();
        assert_eq!(page.layout_id.as_deref(), Some("L1"));
        assert!(page.master_page_id.is_none());

        service
            .set_master_or_layout(&mut page, Some("m2"), Some("L1"), &mut plan, &mut changes)
            .unwrap();
        assert_eq!(page.master_page_id.as_deref(), Some("m2"));
        assert!(page.layout_id.is_none());
    }
}
