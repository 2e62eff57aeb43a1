use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use irmaozinho_core::{Collection, DocumentId};

/// Keys owned by the store; callers cannot set them through `data`.
const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A persisted document. `data` holds the camelCase fields of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: DocumentId,
    pub collection: Collection,
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// Flat view as handed to readers: data plus `id` and timestamps.
    pub fn to_value(&self) -> Value {
        let mut flat = self.data.clone();
        flat.insert("id".into(), Value::String(self.id.to_string()));
        flat.insert("createdAt".into(), Value::String(self.created_at.to_rfc3339()));
        flat.insert("updatedAt".into(), Value::String(self.updated_at.to_rfc3339()));
        Value::Object(flat)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}/{id} not found")]
    NotFound {
        collection: Collection,
        id: DocumentId,
    },

    #[error("document data must be a JSON object")]
    NotAnObject,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored data does not decode into the expected record.
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

/// Field-equality filter. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &StoredDocument) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| doc.field(field) == Some(expected))
    }
}

/// Persistence seam (a hosted document database in production).
///
/// The store owns ids and timestamps: `create` stamps both `created_at` and
/// `updated_at`; `update` merges fields and `replace` swaps them, both bumping
/// `updated_at` only.
pub trait DocumentStore: Send + Sync {
    fn create(&self, collection: Collection, data: Value) -> Result<StoredDocument, StoreError>;

    fn get(&self, collection: Collection, id: DocumentId)
    -> Result<Option<StoredDocument>, StoreError>;

    fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<StoredDocument, StoreError>;

    /// Swap the whole field set, keeping `id` and `created_at`. Fields absent
    /// from `data` are gone afterwards.
    fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        data: Value,
    ) -> Result<StoredDocument, StoreError>;

    fn delete(&self, collection: Collection, id: DocumentId) -> Result<(), StoreError>;

    /// Newest first.
    fn query(&self, collection: Collection, filter: &Filter)
    -> Result<Vec<StoredDocument>, StoreError>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn create(&self, collection: Collection, data: Value) -> Result<StoredDocument, StoreError> {
        (**self).create(collection, data)
    }

    fn get(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get(collection, id)
    }

    fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<StoredDocument, StoreError> {
        (**self).update(collection, id, patch)
    }

    fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        data: Value,
    ) -> Result<StoredDocument, StoreError> {
        (**self).replace(collection, id, data)
    }

    fn delete(&self, collection: Collection, id: DocumentId) -> Result<(), StoreError> {
        (**self).delete(collection, id)
    }

    fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).query(collection, filter)
    }
}

fn into_fields(data: Value) -> Result<Map<String, Value>, StoreError> {
    match data {
        Value::Object(mut map) => {
            for key in RESERVED_KEYS {
                map.remove(key);
            }
            Ok(map)
        }
        _ => Err(StoreError::NotAnObject),
    }
}

#[derive(Debug)]
struct Slot {
    seq: u64,
    doc: StoredDocument,
}

/// In-memory document store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<(Collection, DocumentId), Slot>>,
    next_seq: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.docs
            .read()
            .map(|docs| docs.keys().filter(|(c, _)| *c == collection).count())
            .unwrap_or(0)
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl DocumentStore for InMemoryDocumentStore {
    fn create(&self, collection: Collection, data: Value) -> Result<StoredDocument, StoreError> {
        let data = into_fields(data)?;
        let now = Utc::now();
        let doc = StoredDocument {
            id: DocumentId::new(),
            collection,
            data,
            created_at: now,
            updated_at: now,
        };

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut docs = self.docs.write().map_err(poisoned)?;
        docs.insert(
            (collection, doc.id),
            Slot {
                seq,
                doc: doc.clone(),
            },
        );
        Ok(doc)
    }

    fn get(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let docs = self.docs.read().map_err(poisoned)?;
        Ok(docs.get(&(collection, id)).map(|slot| slot.doc.clone()))
    }

    fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<StoredDocument, StoreError> {
        let patch = into_fields(patch)?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        let doc = &mut docs
            .get_mut(&(collection, id))
            .ok_or(StoreError::NotFound { collection, id })?
            .doc;

        doc.data.extend(patch);
        doc.updated_at = Utc::now().max(doc.created_at);
        Ok(doc.clone())
    }

    fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        data: Value,
    ) -> Result<StoredDocument, StoreError> {
        let data = into_fields(data)?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        let doc = &mut docs
            .get_mut(&(collection, id))
            .ok_or(StoreError::NotFound { collection, id })?
            .doc;

        doc.data = data;
        doc.updated_at = Utc::now().max(doc.created_at);
        Ok(doc.clone())
    }

    fn delete(&self, collection: Collection, id: DocumentId) -> Result<(), StoreError> {
        let mut docs = self.docs.write().map_err(poisoned)?;
        docs.remove(&(collection, id))
            .map(|_| ())
            .ok_or(StoreError::NotFound { collection, id })
    }

    fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let docs = self.docs.read().map_err(poisoned)?;
        let mut found: Vec<&Slot> = docs
            .iter()
            .filter(|((c, _), slot)| *c == collection && filter.matches(&slot.doc))
            .map(|(_, slot)| slot)
            .collect();

        found.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(found.into_iter().map(|slot| slot.doc.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_stamps_id_and_timestamps() {
        let store = InMemoryDocumentStore::new();
        let doc = store
            .create(Collection::Articles, json!({ "title": "Hello", "createdAt": "forged" }))
            .unwrap();

        assert_eq!(doc.created_at, doc.updated_at);
        assert_eq!(doc.str_field("title"), Some("Hello"));
        assert!(doc.field("createdAt").is_none());
        assert_eq!(store.get(Collection::Articles, doc.id).unwrap(), Some(doc));
    }

    #[test]
    fn update_merges_and_keeps_creation_time() {
        let store = InMemoryDocumentStore::new();
        let doc = store
            .create(Collection::Suppliers, json!({ "name": "Ana", "active": true }))
            .unwrap();

        let updated = store
            .update(Collection::Suppliers, doc.id, json!({ "active": false, "id": "other" }))
            .unwrap();

        assert_eq!(updated.id, doc.id);
        assert_eq!(updated.created_at, doc.created_at);
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(updated.str_field("name"), Some("Ana"));
        assert_eq!(updated.field("active"), Some(&json!(false)));
    }

    #[test]
    fn replace_drops_fields_missing_from_the_new_data() {
        let store = InMemoryDocumentStore::new();
        let doc = store
            .create(Collection::Products, json!({ "name": "Mug", "supplierId": "sup-1" }))
            .unwrap();

        let replaced = store
            .replace(Collection::Products, doc.id, json!({ "name": "Mug v2" }))
            .unwrap();

        assert_eq!(replaced.id, doc.id);
        assert_eq!(replaced.created_at, doc.created_at);
        assert_eq!(replaced.str_field("name"), Some("Mug v2"));
        assert!(replaced.field("supplierId").is_none());
        assert!(matches!(
            store.replace(Collection::Articles, doc.id, json!({})),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        let doc = store.create(Collection::Products, json!({ "name": "Mug" })).unwrap();

        assert_eq!(store.get(Collection::Articles, doc.id).unwrap(), None);
        assert!(matches!(
            store.delete(Collection::Articles, doc.id),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(store.len(Collection::Products), 1);
    }

    #[test]
    fn query_filters_and_orders_newest_first() {
        let store = InMemoryDocumentStore::new();
        let first = store
            .create(Collection::Suppliers, json!({ "name": "A", "active": true }))
            .unwrap();
        store
            .create(Collection::Suppliers, json!({ "name": "B", "active": false }))
            .unwrap();
        let third = store
            .create(Collection::Suppliers, json!({ "name": "C", "active": true }))
            .unwrap();

        let active = store
            .query(Collection::Suppliers, &Filter::eq("active", true))
            .unwrap();
        let ids: Vec<_> = active.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        assert_eq!(store.query(Collection::Suppliers, &Filter::all()).unwrap().len(), 3);
    }

    #[test]
    fn non_object_data_is_rejected() {
        let store = InMemoryDocumentStore::new();
        assert!(matches!(
            store.create(Collection::Articles, json!(["x"])),
            Err(StoreError::NotAnObject)
        ));
    }

    #[test]
    fn flat_view_includes_store_fields() {
        let store = InMemoryDocumentStore::new();
        let doc = store.create(Collection::Articles, json!({ "title": "T" })).unwrap();
        let flat = doc.to_value();
        assert_eq!(flat["id"], json!(doc.id.to_string()));
        assert!(flat["createdAt"].is_string());
    }
}
