//! Sitemaps
//!
//! Sitemap nodes may point at a page. Deleting a page unlinks its nodes
//! after an archival snapshot of every affected sitemap.

pub mod entity;
pub mod events;
pub mod service;

pub use entity::{ArchivedNode, Sitemap, SitemapArchive, SitemapNode};
pub use events::{SitemapNodeDeleted, SitemapNodeUpdated, SitemapUpdated};
pub use service::SitemapService;
