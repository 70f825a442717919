//! Media Image Entity

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaImage {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub caption: Option<String>,
    /// Public URL, possibly relative to the media host
    pub public_url: String,
    #[serde(default)]
    pub public_thumbnail_url: String,
    pub audit: Audit,
}

impl_entity!(MediaImage, "media_images", "MediaImage");

impl MediaImage {
    pub fn new(title: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            title: title.into(),
            caption: None,
            public_url: public_url.into(),
            public_thumbnail_url: String::new(),
            audit: Audit::new(),
        }
    }
}
