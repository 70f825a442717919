//! Generic entity repository
//!
//! Typed reads over either a MongoDB database or the in-process store.
//! Aggregate repositories wrap a `Repository<T>` and express their queries
//! as `doc!` filters, which both backends evaluate.

use std::marker::PhantomData;

use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::Database;

use crate::shared::entity::{active, Entity};
use crate::shared::error::Result;
use crate::shared::memory_store::InMemoryStore;

/// Where entities are read from and written to.
#[derive(Clone)]
pub enum StoreBackend {
    Mongo(Database),
    Memory(InMemoryStore),
}

pub struct Repository<T> {
    backend: StoreBackend,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(backend: &StoreBackend) -> Self {
        Self {
            backend: backend.clone(),
            _entity: PhantomData,
        }
    }

    /// Find by id, including soft-deleted records.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(doc! { "_id": id }).await
    }

    /// Find by id, ignoring soft-deleted records.
    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(active(doc! { "_id": id })).await
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.find_active_by_id(id).await?.is_some())
    }

    /// All records that are not soft-deleted.
    pub async fn find_all(&self) -> Result<Vec<T>> {
        self.find(active(doc! {})).await
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        match &self.backend {
            StoreBackend::Mongo(db) => Ok(db.collection::<T>(T::COLLECTION).find_one(filter).await?),
            StoreBackend::Memory(store) => store
                .find_one(T::COLLECTION, &filter)
                .map(bson::from_document)
                .transpose()
                .map_err(Into::into),
        }
    }

    pub async fn find(&self, filter: Document) -> Result<Vec<T>> {
        self.find_sorted(filter, None).await
    }

    pub async fn find_sorted(&self, filter: Document, sort: Option<Document>) -> Result<Vec<T>> {
        match &self.backend {
            StoreBackend::Mongo(db) => {
                let collection = db.collection::<T>(T::COLLECTION);
                let cursor = match sort {
                    Some(sort) => collection.find(filter).sort(sort).await?,
                    None => collection.find(filter).await?,
                };
                Ok(cursor.try_collect().await?)
            }
            StoreBackend::Memory(store) => store
                .find(T::COLLECTION, &filter, sort.as_ref())
                .into_iter()
                .map(|document| bson::from_document(document).map_err(Into::into))
                .collect(),
        }
    }
}
