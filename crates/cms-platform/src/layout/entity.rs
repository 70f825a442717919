//! Layout Entities

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::option::OptionValue;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

/// Page template: a view path plus the regions content can be placed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub layout_path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preview_url: Option<String>,
    /// Option definitions with their default values
    #[serde(default)]
    pub options: Vec<OptionValue>,
    #[serde(default)]
    pub regions: Vec<LayoutRegion>,
    pub audit: Audit,
}

impl_entity!(Layout, "layouts", "Layout");

impl Layout {
    pub fn new(name: impl Into<String>, layout_path: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            name: name.into(),
            layout_path: layout_path.into(),
            preview_url: None,
            options: Vec::new(),
            regions: Vec::new(),
            audit: Audit::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRegion {
    pub region_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(rename = "_id")]
    pub id: String,
    /// Identifier used by layout views, e.g. "CMSMainContent"
    pub region_identifier: String,
    pub audit: Audit,
}

impl_entity!(Region, "regions", "Region");

impl Region {
    pub fn new(region_identifier: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            region_identifier: region_identifier.into(),
            audit: Audit::new(),
        }
    }
}
