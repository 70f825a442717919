//! Page Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

use super::entity::Page;

const SOURCE: &str = "cms:pages";

/// Emitted when Put creates a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCreated {
    pub metadata: EventMetadata,
    pub page_id: String,
    pub page_url: String,
    pub title: String,
}

impl_domain_event!(PageCreated);

impl PageCreated {
    const EVENT_TYPE: &'static str = "cms:pages:page:created";

    pub fn new(ctx: &ExecutionContext, page: &Page) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "page", &page.id),
            page_id: page.id.clone(),
            page_url: page.page_url.clone(),
            title: page.title.clone(),
        }
    }
}

/// Emitted when Put updates an existing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePropertiesChanged {
    pub metadata: EventMetadata,
    pub page_id: String,
    pub page_url: String,
    pub title: String,
    pub version: i64,
}

impl_domain_event!(PagePropertiesChanged);

impl PagePropertiesChanged {
    const EVENT_TYPE: &'static str = "cms:pages:page:properties-changed";

    pub fn new(ctx: &ExecutionContext, page: &Page) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "page", &page.id),
            page_id: page.id.clone(),
            page_url: page.page_url.clone(),
            title: page.title.clone(),
            version: page.audit.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDeleted {
    pub metadata: EventMetadata,
    pub page_id: String,
    pub page_url: String,
}

impl_domain_event!(PageDeleted);

impl PageDeleted {
    const EVENT_TYPE: &'static str = "cms:pages:page:deleted";

    pub fn new(ctx: &ExecutionContext, page: &Page) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, SOURCE, "page", &page.id),
            page_id: page.id.clone(),
            page_url: page.page_url.clone(),
        }
    }
}
