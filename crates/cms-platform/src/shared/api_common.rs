//! Common API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{ "success": bool }` acknowledgement used by the blog option endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }

    pub fn failed() -> Self {
        Self { success: false }
    }
}

/// Response carrying only the identifier of the affected record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdResponse {
    pub id: String,
}
