//! Page properties request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::access::AccessRule;
use crate::option::OptionValue;
use crate::page::Page;
use crate::tag::TagModel;

/// Which page to read and which optional sections to load.
///
/// `page_id` wins over `page_url` when both are supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct GetPagePropertiesQuery {
    pub page_id: Option<String>,
    pub page_url: Option<String>,
    pub include_meta_data: bool,
    pub include_category: bool,
    pub include_layout: bool,
    pub include_images: bool,
    pub include_language: bool,
    pub include_tags: bool,
    pub include_page_contents: bool,
    pub include_page_options: bool,
    pub include_access_rules: bool,
    pub include_page_translations: bool,
}

impl GetPagePropertiesQuery {
    pub fn by_id(page_id: impl Into<String>) -> Self {
        Self {
            page_id: Some(page_id.into()),
            ..Self::default()
        }
    }

    pub fn by_url(page_url: impl Into<String>) -> Self {
        Self {
            page_url: Some(page_url.into()),
            ..Self::default()
        }
    }

    pub fn include_all(mut self) -> Self {
        self.include_meta_data = true;
        self.include_category = true;
        self.include_layout = true;
        self.include_images = true;
        self.include_language = true;
        self.include_tags = true;
        self.include_page_contents = true;
        self.include_page_options = true;
        self.include_access_rules = true;
        self.include_page_translations = true;
        self
    }
}

/// Page record as stored, with dangling references reported as null.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagePropertiesModel {
    pub id: String,
    pub version: i64,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_on: DateTime<Utc>,

    pub page_url: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub published_on: Option<DateTime<Utc>>,

    pub layout_id: Option<String>,
    pub master_page_id: Option<String>,
    pub category_id: Option<String>,
    pub main_image_id: Option<String>,
    pub featured_image_id: Option<String>,
    pub secondary_image_id: Option<String>,

    pub custom_css: Option<String>,
    pub custom_java_script: Option<String>,
    pub use_canonical_url: bool,
    pub use_no_follow: bool,
    pub use_no_index: bool,
    pub is_archived: bool,
    pub is_master_page: bool,

    pub language_id: Option<String>,
    pub language_group_identifier: Option<String>,
}

impl From<&Page> for PagePropertiesModel {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            version: page.audit.version,
            created_by: page.audit.created_by_user.clone(),
            created_on: page.audit.created_on,
            last_modified_by: page.audit.modified_by_user.clone(),
            last_modified_on: page.audit.modified_on,
            page_url: page.page_url.clone(),
            title: page.title.clone(),
            description: page.description.clone(),
            is_published: page.is_published(),
            published_on: page.published_on,
            layout_id: page.layout_id.clone(),
            master_page_id: page.master_page_id.clone(),
            category_id: page.category_id.clone(),
            main_image_id: page.main_image_id.clone(),
            featured_image_id: page.featured_image_id.clone(),
            secondary_image_id: page.secondary_image_id.clone(),
            custom_css: page.custom_css.clone(),
            custom_java_script: page.custom_js.clone(),
            use_canonical_url: page.use_canonical_url,
            use_no_follow: page.use_no_follow,
            use_no_index: page.use_no_index,
            is_archived: page.is_archived,
            is_master_page: page.is_master_page,
            language_id: page.language_id.clone(),
            language_group_identifier: page.language_group_identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataModel {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryModel {
    pub id: String,
    pub version: i64,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_on: DateTime<Utc>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutModel {
    pub id: String,
    pub version: i64,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_on: DateTime<Utc>,
    pub name: String,
    pub layout_path: String,
    pub preview_url: Option<String>,
}

/// Image with its public addresses made absolute.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageModel {
    pub id: String,
    pub version: i64,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_on: DateTime<Utc>,
    pub title: String,
    pub caption: Option<String>,
    pub url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModel {
    pub id: String,
    pub version: i64,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_on: DateTime<Utc>,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageContentModel {
    pub id: String,
    pub version: i64,
    pub content_id: String,
    pub content_name: String,
    pub content_type: String,
    pub is_published: bool,
    pub region_id: String,
    pub region_identifier: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageTranslationModel {
    pub id: String,
    pub title: String,
    pub page_url: String,
    pub language_id: Option<String>,
    pub language_code: Option<String>,
}

/// Denormalized page read. Sections not requested are null.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPagePropertiesResponse {
    pub page: PagePropertiesModel,
    pub meta_data: Option<MetadataModel>,
    pub category: Option<CategoryModel>,
    pub layout: Option<LayoutModel>,
    pub main_image: Option<ImageModel>,
    pub featured_image: Option<ImageModel>,
    pub secondary_image: Option<ImageModel>,
    pub language: Option<LanguageModel>,
    pub tags: Option<Vec<TagModel>>,
    pub page_contents: Option<Vec<PageContentModel>>,
    pub page_options: Option<Vec<OptionValue>>,
    pub access_rules: Option<Vec<AccessRule>>,
    pub page_translations: Option<Vec<PageTranslationModel>>,
}

/// Full replacement of a page's properties.
///
/// `tags`, `access_rules` and `meta_data` are left untouched when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PutPagePropertiesCommand {
    /// Empty creates a page with a generated id
    pub id: String,
    /// Required when the page exists
    pub version: Option<i64>,

    pub page_url: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub published_on: Option<DateTime<Utc>>,

    pub layout_id: Option<String>,
    pub master_page_id: Option<String>,
    pub category_id: Option<String>,
    pub language_id: Option<String>,
    pub language_group_identifier: Option<String>,

    pub main_image_id: Option<String>,
    pub featured_image_id: Option<String>,
    pub secondary_image_id: Option<String>,

    pub custom_css: Option<String>,
    pub custom_java_script: Option<String>,
    pub use_canonical_url: bool,
    pub use_no_follow: bool,
    pub use_no_index: bool,
    pub is_archived: bool,
    pub is_master_page: bool,

    pub meta_data: Option<MetadataModel>,
    pub tags: Option<Vec<String>>,
    pub access_rules: Option<Vec<AccessRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutPagePropertiesResponse {
    pub id: String,
    pub version: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeletePagePropertiesCommand {
    pub id: String,
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeletePagePropertiesQuery {
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePagePropertiesResponse {
    pub deleted: bool,
}
