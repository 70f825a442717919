//! Blog Option Entity

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

/// Single record holding the blog defaults. Either the layout or the
/// master page is set, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogOption {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_layout_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_master_page_id: Option<String>,
    pub audit: Audit,
}

impl_entity!(BlogOption, "blog_options", "BlogOption");

impl BlogOption {
    pub fn new() -> Self {
        Self {
            id: TsidGenerator::generate(),
            default_layout_id: None,
            default_master_page_id: None,
            audit: Audit::new(),
        }
    }
}

impl Default for BlogOption {
    fn default() -> Self {
        Self::new()
    }
}
