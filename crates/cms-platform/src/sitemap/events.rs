//! Sitemap Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

use super::entity::{Sitemap, SitemapNode};

const SOURCE: &str = "cms:sitemaps";

/// A node bound to a deleted page was unlinked from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNodeUpdated {
    pub metadata: EventMetadata,
    pub sitemap_id: String,
    pub node_id: String,
    pub title: String,
    pub url: String,
}

impl_domain_event!(SitemapNodeUpdated);

impl SitemapNodeUpdated {
    const EVENT_TYPE: &'static str = "cms:sitemaps:node:updated";

    pub fn new(ctx: &ExecutionContext, node: &SitemapNode) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "sitemap", &node.sitemap_id),
            sitemap_id: node.sitemap_id.clone(),
            node_id: node.id.clone(),
            title: node.title.clone(),
            url: node.url.clone(),
        }
    }
}

/// A node was removed from its sitemap. Page deletion leaves soft-deleted
/// nodes alone and never raises this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNodeDeleted {
    pub metadata: EventMetadata,
    pub sitemap_id: String,
    pub node_id: String,
}

impl_domain_event!(SitemapNodeDeleted);

impl SitemapNodeDeleted {
    const EVENT_TYPE: &'static str = "cms:sitemaps:node:deleted";

    pub fn new(ctx: &ExecutionContext, node: &SitemapNode) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "sitemap", &node.sitemap_id),
            sitemap_id: node.sitemap_id.clone(),
            node_id: node.id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapUpdated {
    pub metadata: EventMetadata,
    pub sitemap_id: String,
    pub title: String,
}

impl_domain_event!(SitemapUpdated);

impl SitemapUpdated {
    const EVENT_TYPE: &'static str = "cms:sitemaps:sitemap:updated";

    pub fn new(ctx: &ExecutionContext, sitemap: &Sitemap) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "sitemap", &sitemap.id),
            sitemap_id: sitemap.id.clone(),
            title: sitemap.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::DomainEvent;

    #[test]
    fn test_node_events_use_owning_sitemap_as_subject() {
        let ctx = ExecutionContext::create("editor");
        let node = SitemapNode::new("S1", "About", "/about/");

        let updated = SitemapNodeUpdated::new(&ctx, &node);
        let deleted = SitemapNodeDeleted::new(&ctx, &node);

        assert_eq!(updated.event_type(), "cms:sitemaps:node:updated");
        assert_eq!(deleted.event_type(), "cms:sitemaps:node:deleted");
        assert_eq!(updated.subject(), deleted.subject());
        assert_eq!(deleted.node_id, node.id);
    }
}
