//! Access rule types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Deny,
    Read,
    ReadWrite,
}

/// Access granted to a user or role. Unique per (identity, is_for_role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    pub identity: String,
    pub is_for_role: bool,
    pub access_level: AccessLevel,
}

impl AccessRule {
    pub fn new(identity: impl Into<String>, is_for_role: bool, access_level: AccessLevel) -> Self {
        Self {
            identity: identity.into(),
            is_for_role,
            access_level,
        }
    }

    pub fn same_principal(&self, other: &AccessRule) -> bool {
        self.is_for_role == other.is_for_role && self.identity == other.identity
    }
}
