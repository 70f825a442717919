//! Page categories

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub audit: Audit,
}

impl_entity!(Category, "categories", "Category");

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            name: name.into(),
            audit: Audit::new(),
        }
    }
}
