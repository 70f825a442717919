//! Persisted entity contract
//!
//! Every stored record carries an `audit` sub-document with its optimistic
//! version, created/modified stamps and soft-delete flags.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Dotted path of the soft-delete flag, for filters.
pub const DELETED_FIELD: &str = "audit.isDeleted";

/// Dotted path of the optimistic version, for filters.
pub const VERSION_FIELD: &str = "audit.version";

/// Audit sub-record shared by all entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    /// 0 until first saved, then incremented on every write
    pub version: i64,

    #[serde(default)]
    pub created_by_user: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_on: DateTime<Utc>,

    #[serde(default)]
    pub modified_by_user: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub modified_on: DateTime<Utc>,

    #[serde(default)]
    pub is_deleted: bool,

    #[serde(skip_serializing_if = "Option::is_none", default, with = "bson::serde_helpers::chrono_datetime_as_bson_datetime_optional")]
    pub deleted_on: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_by_user: Option<String>,
}

impl Audit {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: 0,
            created_by_user: String::new(),
            created_on: now,
            modified_by_user: String::new(),
            modified_on: now,
            is_deleted: false,
            deleted_on: None,
            deleted_by_user: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.version == 0
    }

    /// Stamp a write by `principal`. Returns the version the store must still hold.
    pub(crate) fn stamp_write(&mut self, principal: &str, now: DateTime<Utc>) -> i64 {
        let expected = self.version;
        if self.is_new() {
            self.created_by_user = principal.to_string();
            self.created_on = now;
        }
        self.modified_by_user = principal.to_string();
        self.modified_on = now;
        self.version += 1;
        expected
    }

    pub(crate) fn mark_deleted(&mut self, principal: &str, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_on = Some(now);
        self.deleted_by_user = Some(principal.to_string());
    }
}

impl Default for Audit {
    fn default() -> Self {
        Self::new()
    }
}

/// A record stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> &str;
    fn audit(&self) -> &Audit;
    fn audit_mut(&mut self) -> &mut Audit;

    fn version(&self) -> i64 {
        self.audit().version
    }

    fn is_deleted(&self) -> bool {
        self.audit().is_deleted
    }
}

/// Implements [`Entity`] for a struct with `id: String` and `audit: Audit` fields.
#[macro_export]
macro_rules! impl_entity {
    ($entity:ty, $collection:expr, $entity_type:expr) => {
        impl $crate::shared::entity::Entity for $entity {
            const COLLECTION: &'static str = $collection;
            const ENTITY_TYPE: &'static str = $entity_type;

            fn id(&self) -> &str {
                &self.id
            }

            fn audit(&self) -> &$crate::shared::entity::Audit {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut $crate::shared::entity::Audit {
                &mut self.audit
            }
        }
    };
}

/// Restrict a filter to records that are not soft-deleted.
pub fn active(mut filter: Document) -> Document {
    filter.insert(DELETED_FIELD, false);
    filter
}

/// Filter matching any of the given ids, soft-deleted or not.
pub fn ids_in(ids: &[String]) -> Document {
    doc! { "_id": { "$in": ids.to_vec() } }
}

/// Treat an empty identifier as absent.
pub fn non_empty(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}
