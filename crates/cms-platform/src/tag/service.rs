//! Tag Service
//!
//! Reads a tag by id or by name. Put and Update acknowledge the request by
//! echoing the identifier and persist nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::details;
use crate::shared::entity::non_empty;
use crate::usecase::UseCaseError;

use super::entity::Tag;
use super::repository::TagRepository;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTagRequest {
    pub tag_id: Option<String>,
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagModel {
    pub id: String,
    pub version: i64,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_on: DateTime<Utc>,
    pub name: String,
}

impl From<Tag> for TagModel {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            version: tag.audit.version,
            created_by: tag.audit.created_by_user,
            created_on: tag.audit.created_on,
            last_modified_by: tag.audit.modified_by_user,
            last_modified_on: tag.audit.modified_on,
            name: tag.name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutTagRequest {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub version: Option<i64>,
}

#[derive(Clone)]
pub struct TagService {
    tags: TagRepository,
}

impl TagService {
    pub fn new(tags: TagRepository) -> Self {
        Self { tags }
    }

    /// The id wins when both id and name are supplied.
    pub async fn get(&self, request: &GetTagRequest) -> Result<TagModel, UseCaseError> {
        let tag = match (non_empty(request.tag_id.as_deref()), non_empty(request.tag_name.as_deref())) {
            (Some(id), _) => self.tags.find_active_by_id(id).await,
            (None, Some(name)) => self.tags.find_by_name(name).await,
            // no key matches no tag
            (None, None) => Ok(None),
        }
        .map_err(|e| UseCaseError::storage("Failed to load tag", e))?;

        tag.map(TagModel::from).ok_or_else(|| {
            UseCaseError::not_found_with_details(
                "TAG_NOT_FOUND",
                "Tag not found",
                details! {
                    "tagId" => request.tag_id,
                    "tagName" => request.tag_name,
                },
            )
        })
    }

    pub fn put(&self, request: &PutTagRequest) -> String {
        debug!(tag_id = %request.id, "Tag put acknowledged");
        request.id.clone()
    }

    pub fn update(&self, request: &PutTagRequest) -> String {
        self.put(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::memory_store::InMemoryStore;
    use crate::shared::repository::StoreBackend;

    fn service_with(tags: &[&Tag]) -> TagService {
        let store = InMemoryStore::new();
        for tag in tags {
            store.seed(*tag).unwrap();
        }
        TagService::new(TagRepository::new(&StoreBackend::Memory(store)))
    }

    #[tokio::test]
    async fn test_get_by_id_and_name() {
        let tag = Tag::new("rust");
        let service = service_with(&[&tag]);

        let by_id = service
            .get(&GetTagRequest { tag_id: Some(tag.id.clone()), tag_name: None })
            .await
            .unwrap();
        assert_eq!(by_id.name, "rust");
        assert_eq!(by_id.version, 1);

        let by_name = service
            .get(&GetTagRequest { tag_id: None, tag_name: Some("rust".into()) })
            .await
            .unwrap();
        assert_eq!(by_name.id, tag.id);

        let any_case = service
            .get(&GetTagRequest { tag_id: None, tag_name: Some(" RUST ".into()) })
            .await
            .unwrap();
        assert_eq!(any_case.id, tag.id);
        assert_eq!(any_case.name, "rust");
    }

    #[tokio::test]
    async fn test_unmatched_tag_is_not_found() {
        let service = service_with(&[]);
        let err = service
            .get(&GetTagRequest { tag_id: Some("0HZXEQ5Y8JY5Z".into()), tag_name: None })
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = service
            .get(&GetTagRequest { tag_id: None, tag_name: Some("missing".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TAG_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_without_key_is_not_found() {
        let tag = Tag::new("rust");
        let service = service_with(&[&tag]);
        let err = service
            .get(&GetTagRequest { tag_id: Some("  ".into()), tag_name: None })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.code(), "TAG_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_deleted_tag_is_hidden() {
        let mut tag = Tag::new("gone");
        tag.audit.is_deleted = true;
        let service = service_with(&[&tag]);
        let err = service
            .get(&GetTagRequest { tag_id: Some(tag.id.clone()), tag_name: None })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_put_and_update_echo_id() {
        let service = service_with(&[]);
        let request = PutTagRequest { id: "T1".into(), name: Some("x".into()), version: None };
        assert_eq!(service.put(&request), "T1");
        assert_eq!(service.update(&request), "T1");
    }
}
