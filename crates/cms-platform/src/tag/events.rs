//! Tag Domain Events

use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::usecase::{EventMetadata, ExecutionContext};

use super::entity::Tag;

/// Emitted for every tag created while saving a page's tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCreated {
    pub metadata: EventMetadata,
    pub tag_id: String,
    pub name: String,
}

impl_domain_event!(TagCreated);

impl TagCreated {
    const EVENT_TYPE: &'static str = "cms:tags:tag:created";
    const SOURCE: &'static str = "cms:tags";

    pub fn new(ctx: &ExecutionContext, tag: &Tag) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(ctx, Self::EVENT_TYPE, Self::SOURCE, "tag", &tag.id),
            tag_id: tag.id.clone(),
            name: tag.name.clone(),
        }
    }
}
