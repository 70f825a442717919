//! Content languages

use serde::{Deserialize, Serialize};

use crate::impl_entity;
use crate::shared::entity::Audit;
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Culture code, e.g. "en-US"
    pub code: String,
    pub audit: Audit,
}

impl_entity!(Language, "languages", "Language");

impl Language {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: TsidGenerator::generate(),
            name: name.into(),
            code: code.into(),
            audit: Audit::new(),
        }
    }
}
