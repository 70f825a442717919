//! Content Entities

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentStatus {
    Draft,
    Published,
    Preview,
    Archived,
}

/// What a content item renders as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    HtmlContent { html: String },
    HtmlWidget { html: String },
    ServerWidget { path: String },
    BlogPost { html: String },
}

impl ContentKind {
    /// Content type label exposed to API clients.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::HtmlContent { .. } => "html-content",
            ContentKind::HtmlWidget { .. } => "html-widget",
            ContentKind::ServerWidget { .. } => "server-widget",
            ContentKind::BlogPost { .. } => "blog-post-content",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub status: ContentStatus,
    pub kind: ContentKind,
    pub audit: Audit,
}

impl_entity!(Content, "contents", "Content");

impl Content {
    pub fn new(name: impl Into<String>, status: ContentStatus, kind: ContentKind) -> Self {
        Self {
            id: TsidGenerator::generate(),
            name: name.into(),
            status,
            kind,
            audit: Audit::new(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

/// Placement of a content in a page region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(rename = "_id")]
    pub id: String,
    pub page_id: String,
    pub content_id: String,
    pub region_id: String,
    pub order: i32,
    pub audit: Audit,
}

impl_entity!(PageContent, "page_contents", "PageContent");

impl PageContent {
    pub fn new(
        page_id: impl Into<String>,
        content_id: impl Into<String>,
        region_id: impl Into<String>,
        order: i32,
    ) -> Self {
        Self {
            id: TsidGenerator::generate(),
            page_id: page_id.into(),
            content_id: content_id.into(),
            region_id: region_id.into(),
            order,
            audit: Audit::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ContentKind::HtmlContent { html: String::new() }.label(), "html-content");
        assert_eq!(ContentKind::HtmlWidget { html: String::new() }.label(), "html-widget");
        assert_eq!(ContentKind::ServerWidget { path: "~/w.cshtml".into() }.label(), "server-widget");
        assert_eq!(ContentKind::BlogPost { html: String::new() }.label(), "blog-post-content");
    }

    #[test]
    fn test_kind_round_trips_through_bson() {
        let content = Content::new(
            "Footer",
            ContentStatus::Published,
            ContentKind::ServerWidget { path: "~/Views/Footer.cshtml".into() },
        );
        let document = bson::to_document(&content).unwrap();
        let kind = document.get_document("kind").unwrap();
        assert_eq!(kind.get_str("type").unwrap(), "SERVER_WIDGET");
        let back: Content = bson::from_document(document).unwrap();
        assert_eq!(back.kind, content.kind);
    }
}
