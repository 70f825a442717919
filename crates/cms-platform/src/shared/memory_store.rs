//! In-process document store
//!
//! Holds BSON documents per collection behind a `parking_lot` lock and
//! evaluates the subset of MongoDB filter syntax the repositories use:
//! dotted-path equality, `$in`, `$nin`, `$ne` and `$exists`, plus sort
//! documents. Backs development mode and the test suites.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bson::{Bson, Document};
use chrono::Utc;
use parking_lot::RwLock;

use crate::shared::entity::Entity;
use crate::shared::error::Result;

pub(crate) type Collections = HashMap<String, BTreeMap<String, Document>>;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a record outside any unit of work.
    /// A never-saved record is stored as version 1.
    pub fn seed<T: Entity>(&self, entity: &T) -> Result<()> {
        let mut entity = entity.clone();
        if entity.audit().is_new() {
            entity.audit_mut().stamp_write("system", Utc::now());
        }
        let document = bson::to_document(&entity)?;
        self.collections
            .write()
            .entry(T::COLLECTION.to_string())
            .or_default()
            .insert(entity.id().to_string(), document);
        Ok(())
    }

    pub fn find_one(&self, collection: &str, filter: &Document) -> Option<Document> {
        let guard = self.collections.read();
        guard
            .get(collection)?
            .values()
            .find(|document| matches(document, filter))
            .cloned()
    }

    pub fn find(&self, collection: &str, filter: &Document, sort: Option<&Document>) -> Vec<Document> {
        let guard = self.collections.read();
        let mut found: Vec<Document> = guard
            .get(collection)
            .map(|records| {
                records
                    .values()
                    .filter(|document| matches(document, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            found.sort_by(|a, b| compare_by_sort(a, b, sort));
        }
        found
    }

    pub fn count(&self, collection: &str, filter: &Document) -> usize {
        let guard = self.collections.read();
        guard
            .get(collection)
            .map(|records| records.values().filter(|d| matches(d, filter)).count())
            .unwrap_or(0)
    }

    /// Run `apply` against a copy of every collection and publish the copy
    /// only if it succeeds.
    pub(crate) fn transact<R, E, F>(&self, apply: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Collections) -> std::result::Result<R, E>,
    {
        let mut guard = self.collections.write();
        let mut working = guard.clone();
        let outcome = apply(&mut working)?;
        *guard = working;
        Ok(outcome)
    }
}

/// Resolve a dotted path such as `audit.isDeleted`.
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// MongoDB-style match of a document against a filter.
pub fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(path, condition)| {
        let value = lookup(document, path);
        match condition {
            Bson::Document(ops) if is_operator_document(ops) => ops
                .iter()
                .all(|(op, argument)| apply_operator(value, op, argument)),
            expected => value_equals(value, expected),
        }
    })
}

fn is_operator_document(document: &Document) -> bool {
    document.keys().next().map_or(false, |key| key.starts_with('$'))
}

fn apply_operator(value: Option<&Bson>, op: &str, argument: &Bson) -> bool {
    match (op, argument) {
        ("$in", Bson::Array(items)) => items.iter().any(|item| value_equals(value, item)),
        ("$nin", Bson::Array(items)) => !items.iter().any(|item| value_equals(value, item)),
        ("$ne", other) => !value_equals(value, other),
        ("$exists", Bson::Boolean(wanted)) => value.is_some() == *wanted,
        _ => false,
    }
}

fn value_equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match (value, expected) {
        (None, Bson::Null) => true,
        (None, _) => false,
        (Some(Bson::Array(items)), scalar) if !matches!(scalar, Bson::Array(_)) => items
            .iter()
            .any(|item| compare_bson(item, scalar) == Some(Ordering::Equal)),
        (Some(actual), expected) => compare_bson(actual, expected) == Some(Ordering::Equal),
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare_bson(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.timestamp_millis().cmp(&y.timestamp_millis())),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        (Bson::Document(x), Bson::Document(y)) => (x == y).then_some(Ordering::Equal),
        (Bson::Array(x), Bson::Array(y)) => (x == y).then_some(Ordering::Equal),
        _ => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

fn compare_by_sort(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (path, direction) in sort {
        let descending = as_number(direction).map_or(false, |d| d < 0.0);
        let ordering = match (lookup(a, path), lookup(b, path)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare_bson(x, y).unwrap_or(Ordering::Equal),
        };
        let ordering = if descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
