//! Page Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::access::AccessRule;
use crate::impl_entity;
use crate::option::OptionValue;
use crate::shared::entity::Audit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
    #[default]
    Unpublished,
    Published,
}

/// A routable page. Either `layout_id` or `master_page_id` is set, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "_id")]
    pub id: String,

    pub page_url: String,
    /// Hex SHA-256 of `page_url`
    pub page_url_hash: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none", default, with = "bson::serde_helpers::chrono_datetime_as_bson_datetime_optional")]
    pub published_on: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub layout_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub master_page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language_id: Option<String>,
    /// Shared by all translations of the same page
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language_group_identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub main_image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub featured_image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secondary_image_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_js: Option<String>,

    #[serde(default)]
    pub use_canonical_url: bool,
    #[serde(default)]
    pub use_no_follow: bool,
    #[serde(default)]
    pub use_no_index: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_master_page: bool,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta_keywords: Option<String>,

    #[serde(default)]
    pub options: Vec<OptionValue>,
    #[serde(default)]
    pub access_rules: Vec<AccessRule>,

    pub audit: Audit,
}

impl_entity!(Page, "pages", "Page");

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page_url: String::new(),
            page_url_hash: String::new(),
            title: String::new(),
            description: None,
            status: PageStatus::Unpublished,
            published_on: None,
            layout_id: None,
            master_page_id: None,
            category_id: None,
            language_id: None,
            language_group_identifier: None,
            main_image_id: None,
            featured_image_id: None,
            secondary_image_id: None,
            custom_css: None,
            custom_js: None,
            use_canonical_url: false,
            use_no_follow: false,
            use_no_index: false,
            is_archived: false,
            is_master_page: false,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            options: Vec::new(),
            access_rules: Vec::new(),
            audit: Audit::new(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }
}
