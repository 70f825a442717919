//! Sitemap Entities

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sitemap {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub audit: Audit,
}

impl_entity!(Sitemap, "sitemaps", "Sitemap");

impl Sitemap {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            title: title.into(),
            audit: Audit::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNode {
    #[serde(rename = "_id")]
    pub id: String,
    pub sitemap_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_id: Option<String>,
    pub title: String,
    pub url: String,
    pub url_hash: String,
    /// Node title follows the linked page's title
    #[serde(default)]
    pub use_page_title_as_node_title: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_node_id: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    pub audit: Audit,
}

impl_entity!(SitemapNode, "sitemap_nodes", "SitemapNode");

impl SitemapNode {
    pub fn new(sitemap_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            sitemap_id: sitemap_id.into(),
            page_id: None,
            title: title.into(),
            url: url.into(),
            url_hash: String::new(),
            use_page_title_as_node_title: false,
            parent_node_id: None,
            display_order: 0,
            audit: Audit::new(),
        }
    }

    pub fn for_page(mut self, page_id: impl Into<String>, use_page_title: bool) -> Self {
        self.page_id = Some(page_id.into());
        self.use_page_title_as_node_title = use_page_title;
        self
    }
}

/// Node state captured in an archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedNode {
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_id: Option<String>,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_node_id: Option<String>,
    pub display_order: i32,
}

impl From<&SitemapNode> for ArchivedNode {
    fn from(node: &SitemapNode) -> Self {
        Self {
            node_id: node.id.clone(),
            page_id: node.page_id.clone(),
            title: node.title.clone(),
            url: node.url.clone(),
            parent_node_id: node.parent_node_id.clone(),
            display_order: node.display_order,
        }
    }
}

/// Snapshot of a sitemap taken before a change that rewrites its nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapArchive {
    #[serde(rename = "_id")]
    pub id: String,
    pub sitemap_id: String,
    pub title: String,
    /// Why the snapshot was taken
    pub reason: String,
    pub nodes: Vec<ArchivedNode>,
    pub audit: Audit,
}

impl_entity!(SitemapArchive, "sitemap_archives", "SitemapArchive");
