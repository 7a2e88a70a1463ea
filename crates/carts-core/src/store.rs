//! # Document Store
//!
//! The `DocumentStore` trait is the seam between the HTTP layer and the
//! database. `ResourceStore` sits on top of it and offers the per-collection
//! operations the routes use.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               ResourceStore                  │
//! │  list_newest_first / find_by_id / find_many  │
//! │  insert_one / update_* / upsert_where / ...  │
//! └──────────────────────┬───────────────────────┘
//!                        │ Arc<dyn DocumentStore>
//!          ┌─────────────┴─────────────┐
//!  ┌───────┴───────┐           ┌───────┴───────┐
//!  │  MongoStore   │           │  MemoryStore  │
//!  └───────────────┘           └───────────────┘
//! ```
//!
//! Every operation is a direct pass-through: the request body or path
//! parameter becomes the filter or `$set` document verbatim.

use crate::error::CartsResult;
use crate::record::{
    as_document, Collection, DeleteOutcome, Filter, InsertOutcome, RecordId, UpdateOutcome,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Storage backend for loosely-typed JSON records.
///
/// Implementations must make each single-record write atomic; nothing
/// above this trait serializes concurrent writers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All records matching `filter`, in natural insertion order
    async fn find(&self, collection: Collection, filter: &Filter) -> CartsResult<Vec<Value>>;

    /// First record matching `filter`
    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> CartsResult<Option<Value>>;

    /// Insert a record, assigning it a fresh `_id`
    async fn insert_one(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> CartsResult<InsertOutcome>;

    /// Merge `set` into the first record matching `filter`.
    ///
    /// With `upsert`, a miss inserts the filter's equality fields plus `set`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Map<String, Value>,
        upsert: bool,
    ) -> CartsResult<UpdateOutcome>;

    /// Delete the first record matching `filter`
    async fn delete_one(&self, collection: Collection, filter: &Filter)
        -> CartsResult<DeleteOutcome>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;

    /// Release connections on shutdown
    async fn close(&self) {}
}

/// Type alias for a shared store backend (dynamic dispatch)
pub type BoxedDocumentStore = Arc<dyn DocumentStore>;

/// Resource access over the five record collections
#[derive(Clone)]
pub struct ResourceStore {
    backend: BoxedDocumentStore,
}

impl ResourceStore {
    pub fn new(backend: BoxedDocumentStore) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Every record, most recently inserted first.
    ///
    /// This reverses the store's iteration order; no timestamp is consulted.
    pub async fn list_newest_first(&self, collection: Collection) -> CartsResult<Vec<Value>> {
        let mut records = self.backend.find(collection, &Filter::All).await?;
        records.reverse();
        debug!(%collection, count = records.len(), "Listed records");
        Ok(records)
    }

    pub async fn find_by_id(&self, collection: Collection, id: RecordId) -> CartsResult<Option<Value>> {
        debug!(%collection, %id, "Finding record by id");
        self.backend.find_one(collection, &Filter::Id(id)).await
    }

    pub async fn find_one(&self, collection: Collection, filter: Filter) -> CartsResult<Option<Value>> {
        debug!(%collection, ?filter, "Finding record");
        self.backend.find_one(collection, &filter).await
    }

    pub async fn find_many(&self, collection: Collection, filter: Filter) -> CartsResult<Vec<Value>> {
        debug!(%collection, ?filter, "Finding records");
        self.backend.find(collection, &filter).await
    }

    pub async fn insert_one(&self, collection: Collection, body: Value) -> CartsResult<InsertOutcome> {
        let document = as_document(body)?;
        let outcome = self.backend.insert_one(collection, document).await?;
        debug!(%collection, id = %outcome.inserted_id, "Inserted record");
        Ok(outcome)
    }

    pub async fn update_by_id(
        &self,
        collection: Collection,
        id: RecordId,
        set: Value,
    ) -> CartsResult<UpdateOutcome> {
        self.update_where(collection, Filter::Id(id), set).await
    }

    pub async fn update_where(
        &self,
        collection: Collection,
        filter: Filter,
        set: Value,
    ) -> CartsResult<UpdateOutcome> {
        let set = as_document(set)?;
        let outcome = self.backend.update_one(collection, &filter, set, false).await?;
        debug!(%collection, ?filter, matched = outcome.matched_count, "Updated record");
        Ok(outcome)
    }

    /// Update-or-insert keyed by `filter` (one code path for both)
    pub async fn upsert_where(
        &self,
        collection: Collection,
        filter: Filter,
        set: Value,
    ) -> CartsResult<UpdateOutcome> {
        let set = as_document(set)?;
        let outcome = self.backend.update_one(collection, &filter, set, true).await?;
        debug!(
            %collection,
            ?filter,
            matched = outcome.matched_count,
            upserted = outcome.upserted_count,
            "Upserted record"
        );
        Ok(outcome)
    }

    pub async fn delete_by_id(&self, collection: Collection, id: RecordId) -> CartsResult<DeleteOutcome> {
        let outcome = self.backend.delete_one(collection, &Filter::Id(id)).await?;
        debug!(%collection, %id, deleted = outcome.deleted_count, "Deleted record");
        Ok(outcome)
    }

    pub async fn close(&self) {
        self.backend.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CartsError;
    use crate::memory::MemoryStore;
    use serde_json::json;

    fn store() -> ResourceStore {
        ResourceStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_list_is_reverse_insertion_order() {
        let store = store();
        // Timestamps deliberately disagree with insertion order
        for (name, created) in [("first", 3), ("second", 1), ("third", 2)] {
            store
                .insert_one(Collection::Parts, json!({"name": name, "createdAt": created}))
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .list_newest_first(Collection::Parts)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_upsert_shares_one_record() {
        let store = store();
        let filter = Filter::eq("email", "alice@example.com");

        let first = store
            .upsert_where(Collection::Users, filter.clone(), json!({"name": "Alice"}))
            .await
            .unwrap();
        assert_eq!(first.upserted_count, 1);

        let second = store
            .upsert_where(Collection::Users, filter.clone(), json!({"name": "Alice B"}))
            .await
            .unwrap();
        assert_eq!(second.matched_count, 1);
        assert_eq!(second.upserted_id, None);

        let users = store.find_many(Collection::Users, filter).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["name"], "Alice B");
        assert_eq!(users[0]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object_body() {
        let err = store()
            .insert_one(Collection::Reviews, json!("great"))
            .await
            .unwrap_err();
        assert!(matches!(err, CartsError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_an_error() {
        let found = store()
            .find_by_id(Collection::Parts, RecordId::generate())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
