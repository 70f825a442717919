//! Unit of Work
//!
//! Use cases stage every write of an operation in a [`ChangeSet`] and hand it
//! to a [`UnitOfWork`], which applies all of it atomically together with one
//! audit log entry. Optimistic version checks happen inside the commit; any
//! failure aborts the whole set. Dropping a `ChangeSet` without committing it
//! discards the staged writes.

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, ClientSession, Database};
use serde::Serialize;
use tracing::{debug, error};

use super::error::UseCaseError;
use super::execution_context::ExecutionContext;
use super::result::UseCaseResult;
use crate::audit::{AuditLog, AUDIT_LOG_COLLECTION};
use crate::details;
use crate::shared::entity::{Entity, VERSION_FIELD};
use crate::shared::memory_store::InMemoryStore;

/// A fully serialized write waiting for commit.
#[derive(Debug, Clone)]
pub struct StagedWrite {
    pub collection: &'static str,
    pub id: String,
    /// Version the store must hold; 0 means the record must not exist yet.
    pub expected_version: i64,
    pub document: Document,
}

impl StagedWrite {
    fn key(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }

    fn conflict(&self) -> UseCaseError {
        UseCaseError::concurrency_with_details(
            "VERSION_CONFLICT",
            format!("{} '{}' was modified by another request", self.collection, self.id),
            details! { "id" => self.id, "expectedVersion" => self.expected_version },
        )
    }
}

/// Writes staged by one use case execution.
pub struct ChangeSet {
    aggregate_type: &'static str,
    aggregate_id: String,
    principal_id: String,
    now: DateTime<Utc>,
    writes: Vec<StagedWrite>,
}

impl ChangeSet {
    pub fn new(ctx: &ExecutionContext, aggregate_type: &'static str, aggregate_id: impl Into<String>) -> Self {
        Self {
            aggregate_type,
            aggregate_id: aggregate_id.into(),
            principal_id: ctx.principal_id.clone(),
            now: Utc::now(),
            writes: Vec::new(),
        }
    }

    /// Stamp audit fields, bump the version and stage the record.
    pub fn save<T: Entity>(&mut self, entity: &mut T) -> Result<(), UseCaseError> {
        let expected_version = entity.audit_mut().stamp_write(&self.principal_id, self.now);
        let document = match bson::to_document(entity) {
            Ok(document) => document,
            Err(e) => {
                entity.audit_mut().version = expected_version;
                return Err(UseCaseError::commit(format!(
                    "Failed to serialize {} '{}': {}",
                    T::ENTITY_TYPE,
                    entity.id(),
                    e
                )));
            }
        };

        self.writes.push(StagedWrite {
            collection: T::COLLECTION,
            id: entity.id().to_string(),
            expected_version,
            document,
        });
        Ok(())
    }

    /// Soft-delete the record; it stays in its collection flagged as deleted.
    pub fn delete<T: Entity>(&mut self, entity: &mut T) -> Result<(), UseCaseError> {
        entity.audit_mut().mark_deleted(&self.principal_id, self.now);
        self.save(entity)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[StagedWrite] {
        &self.writes
    }

    fn audit_log<C: Serialize>(&self, command: &C) -> AuditLog {
        let entity_id = Some(self.aggregate_id.clone()).filter(|id| !id.is_empty());
        AuditLog::from_command(self.aggregate_type, entity_id, command, Some(self.principal_id.clone()))
            .with_affected(self.writes.iter().map(StagedWrite::key).collect())
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    pub audit_log_id: String,
    pub writes: usize,
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Apply every staged write plus one audit log entry, or nothing.
    async fn commit<C>(&self, changes: ChangeSet, command: &C) -> UseCaseResult<CommitReceipt>
    where
        C: Serialize + Send + Sync;
}

/// MongoDB implementation using multi-document transactions.
///
/// Requires a replica set deployment.
#[derive(Clone)]
pub struct MongoUnitOfWork {
    client: Client,
    database: Database,
}

impl MongoUnitOfWork {
    pub fn new(client: Client, database: Database) -> Self {
        Self { client, database }
    }

    async fn apply(&self, session: &mut ClientSession, write: &StagedWrite) -> Result<(), UseCaseError> {
        let collection = self.database.collection::<Document>(write.collection);

        if write.expected_version == 0 {
            return match collection.insert_one(&write.document).session(&mut *session).await {
                Ok(_) => Ok(()),
                Err(e) if is_duplicate_key(&e) => Err(write.conflict()),
                Err(e) => Err(UseCaseError::commit(format!("Failed to insert {}: {}", write.key(), e))),
            };
        }

        let mut filter = doc! { "_id": write.id.as_str() };
        filter.insert(VERSION_FIELD, write.expected_version);

        let result = collection
            .replace_one(filter, &write.document)
            .session(&mut *session)
            .await
            .map_err(|e| UseCaseError::commit(format!("Failed to update {}: {}", write.key(), e)))?;

        if result.matched_count == 0 {
            return Err(write.conflict());
        }
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

#[async_trait]
impl UnitOfWork for MongoUnitOfWork {
    async fn commit<C>(&self, changes: ChangeSet, command: &C) -> UseCaseResult<CommitReceipt>
    where
        C: Serialize + Send + Sync,
    {
        let audit_log = changes.audit_log(command);

        let mut session = match self.client.start_session().await {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to start MongoDB session: {}", e);
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to start session: {}",
                    e
                )));
            }
        };

        if let Err(e) = session.start_transaction().await {
            error!("Failed to start transaction: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to start transaction: {}",
                e
            )));
        }

        for write in changes.writes() {
            if let Err(err) = self.apply(&mut session, write).await {
                let _ = session.abort_transaction().await;
                error!(key = %write.key(), error = %err, "Aborting transaction");
                return UseCaseResult::failure(err);
            }
        }

        let audit_collection = self.database.collection::<AuditLog>(AUDIT_LOG_COLLECTION);
        if let Err(e) = audit_collection.insert_one(&audit_log).session(&mut session).await {
            let _ = session.abort_transaction().await;
            error!("Failed to insert audit log: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to insert audit log: {}",
                e
            )));
        }

        if let Err(e) = session.commit_transaction().await {
            error!("Failed to commit transaction: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to commit transaction: {}",
                e
            )));
        }

        debug!(
            aggregate = changes.aggregate_type,
            writes = changes.len(),
            audit_log_id = %audit_log.id,
            "Committed transaction"
        );

        UseCaseResult::success(CommitReceipt {
            audit_log_id: audit_log.id,
            writes: changes.len(),
        })
    }
}

/// Unit of work over the in-process store.
///
/// The whole change set is applied to a copy of the store, which replaces
/// the live data only when every write passed its version check.
#[derive(Clone)]
pub struct InMemoryUnitOfWork {
    store: InMemoryStore,
}

impl InMemoryUnitOfWork {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn stored_version(document: &Document) -> i64 {
    document
        .get_document("audit")
        .ok()
        .and_then(|audit| audit.get_i64("version").ok())
        .unwrap_or_default()
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit<C>(&self, changes: ChangeSet, command: &C) -> UseCaseResult<CommitReceipt>
    where
        C: Serialize + Send + Sync,
    {
        let audit_log = changes.audit_log(command);
        let audit_document = match bson::to_document(&audit_log) {
            Ok(document) => document,
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to serialize audit log: {}",
                    e
                )))
            }
        };

        let outcome = self.store.transact(|collections| {
            for write in changes.writes() {
                let records = collections.entry(write.collection.to_string()).or_default();
                let current = records.get(&write.id).map(stored_version);
                let accepted = match current {
                    None => write.expected_version == 0,
                    Some(version) => write.expected_version != 0 && version == write.expected_version,
                };
                if !accepted {
                    return Err(write.conflict());
                }
                records.insert(write.id.clone(), write.document.clone());
            }
            collections
                .entry(AUDIT_LOG_COLLECTION.to_string())
                .or_default()
                .insert(audit_log.id.clone(), audit_document);
            Ok(())
        });

        if let Err(err) = outcome {
            debug!(aggregate = changes.aggregate_type, error = %err, "Discarded change set");
            return UseCaseResult::failure(err);
        }

        debug!(
            aggregate = changes.aggregate_type,
            writes = changes.len(),
            "Committed change set"
        );

        UseCaseResult::success(CommitReceipt {
            audit_log_id: audit_log.id,
            writes: changes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::shared::repository::{Repository, StoreBackend};

    #[derive(Serialize)]
    struct RenameCategories;

    fn ctx() -> ExecutionContext {
        ExecutionContext::create("editor")
    }

    #[tokio::test]
    async fn test_commit_inserts_and_writes_audit_log() {
        let store = InMemoryStore::new();
        let uow = InMemoryUnitOfWork::new(store.clone());

        let mut category = Category::new("News");
        let mut changes = ChangeSet::new(&ctx(), "Category", category.id.clone());
        changes.save(&mut category).unwrap();
        assert_eq!(category.audit.version, 1);

        let receipt = uow.commit(changes, &RenameCategories).await.unwrap();
        assert_eq!(receipt.writes, 1);
        assert_eq!(store.count(AUDIT_LOG_COLLECTION, &doc! {}), 1);

        let repo = Repository::<Category>::new(&StoreBackend::Memory(store));
        let stored = repo.find_by_id(&category.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "News");
        assert_eq!(stored.audit.created_by_user, "editor");
    }

    #[tokio::test]
    async fn test_stale_write_rolls_back_whole_change_set() {
        let store = InMemoryStore::new();
        let uow = InMemoryUnitOfWork::new(store.clone());

        let mut first = Category::new("First");
        let mut stale = Category::new("Stale");
        store.seed(&stale).unwrap();
        // store holds version 1; pretend our copy was read at version 5
        stale.audit.version = 5;

        let mut changes = ChangeSet::new(&ctx(), "Category", "");
        changes.save(&mut first).unwrap();
        changes.save(&mut stale).unwrap();

        let err = uow.commit(changes, &RenameCategories).await.unwrap_err();
        assert!(err.is_concurrency());
        assert_eq!(store.count(Category::COLLECTION, &doc! {}), 1);
        assert_eq!(store.count(AUDIT_LOG_COLLECTION, &doc! {}), 0);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_record() {
        let store = InMemoryStore::new();
        let uow = InMemoryUnitOfWork::new(store.clone());
        let mut category = Category::new("Old");
        store.seed(&category).unwrap();
        category.audit.version = 1;

        let mut changes = ChangeSet::new(&ctx(), "Category", category.id.clone());
        changes.delete(&mut category).unwrap();
        uow.commit(changes, &RenameCategories).await.unwrap();

        let repo = Repository::<Category>::new(&StoreBackend::Memory(store));
        assert!(repo.find_active_by_id(&category.id).await.unwrap().is_none());
        let deleted = repo.find_by_id(&category.id).await.unwrap().unwrap();
        assert!(deleted.audit.is_deleted);
        assert_eq!(deleted.audit.version, 2);
        assert_eq!(deleted.audit.deleted_by_user.as_deref(), Some("editor"));
    }

    #[test]
    fn test_dropped_change_set_stages_nothing_in_store() {
        let store = InMemoryStore::new();
        {
            let mut category = Category::new("Draft");
            let mut changes = ChangeSet::new(&ctx(), "Category", "");
            changes.save(&mut category).unwrap();
            assert_eq!(changes.len(), 1);
        }
        assert_eq!(store.count(Category::COLLECTION, &doc! {}), 0);
    }
}
