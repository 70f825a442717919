//! Tag Entities

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Lowercased name, used to match tag names regardless of case
    #[serde(default)]
    pub normalized_name: String,
    pub audit: Audit,
}

impl_entity!(Tag, "tags", "Tag");

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: TsidGenerator::generate(),
            normalized_name: normalize_tag_name(&name),
            name,
            audit: Audit::new(),
        }
    }
}

/// Case-folded form of a tag name.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTag {
    #[serde(rename = "_id")]
    pub id: String,
    pub page_id: String,
    pub tag_id: String,
    pub audit: Audit,
}

impl_entity!(PageTag, "page_tags", "PageTag");

impl PageTag {
    pub fn new(page_id: impl Into<String>, tag_id: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            page_id: page_id.into(),
            tag_id: tag_id.into(),
            audit: Audit::new(),
        }
    }
}
