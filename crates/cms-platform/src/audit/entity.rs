//! Audit Log Entity
//!
//! One entry per committed unit of work.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::tsid::TsidGenerator;

pub const AUDIT_LOG_COLLECTION: &str = "audit_logs";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    #[serde(rename = "_id")]
    pub id: String,

    /// Aggregate type the operation targeted, e.g. "Page"
    pub entity_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Command type name, e.g. "PutPagePropertiesRequest"
    pub operation: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_json: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,

    /// `{collection}/{id}` of every record the commit wrote
    #[serde(default)]
    pub affected: Vec<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub performed_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn from_command<C: Serialize>(
        entity_type: impl Into<String>,
        entity_id: Option<String>,
        command: &C,
        principal_id: Option<String>,
    ) -> Self {
        let operation = std::any::type_name::<C>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown")
            .to_string();

        Self {
            id: TsidGenerator::generate(),
            entity_type: entity_type.into(),
            entity_id,
            operation,
            operation_json: serde_json::to_string(command).ok(),
            principal_id,
            affected: Vec::new(),
            performed_at: Utc::now(),
        }
    }

    pub fn with_affected(mut self, affected: Vec<String>) -> Self {
        self.affected = affected;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct SaveDefaultTemplate {
        template_id: String,
    }

    #[test]
    fn test_operation_name_from_command_type() {
        let log = AuditLog::from_command(
            "BlogOption",
            None,
            &SaveDefaultTemplate { template_id: "T1".into() },
            Some("editor".into()),
        );
        assert_eq!(log.operation, "SaveDefaultTemplate");
        assert!(log.operation_json.unwrap().contains("T1"));
    }
}
