//! Master Page Link Entity

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

/// `page_id` has `master_id` somewhere in its master chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterPage {
    #[serde(rename = "_id")]
    pub id: String,
    pub page_id: String,
    pub master_id: String,
    pub audit: Audit,
}

impl_entity!(MasterPage, "master_pages", "MasterPage");

impl MasterPage {
    pub fn new(page_id: impl Into<String>, master_id: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            page_id: page_id.into(),
            master_id: master_id.into(),
            audit: Audit::new(),
        }
    }
}
