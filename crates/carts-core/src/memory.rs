//! # In-Memory Store
//!
//! A `DocumentStore` held in process memory. Records keep their insertion
//! order, and each operation runs under one lock, so single-record writes
//! are atomic just as they are in the database.

use crate::error::{CartsError, CartsResult};
use crate::record::{
    Collection, DeleteOutcome, Filter, InsertOutcome, RecordId, UpdateOutcome, ID_FIELD,
};
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Record = Map<String, Value>;

/// In-process record storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CartsResult<MutexGuard<'_, HashMap<Collection, Vec<Record>>>> {
        self.collections
            .lock()
            .map_err(|_| CartsError::Internal("memory store lock poisoned".to_string()))
    }

    /// Number of records in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.lock()
            .map(|c| c.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

/// Give the record an `_id` unless it already carries one.
///
/// A caller-supplied `_id` of any type is kept, as the database keeps it.
fn assign_id(record: &mut Record) -> Value {
    record
        .entry(ID_FIELD)
        .or_insert_with(|| Value::String(RecordId::generate().to_hex()))
        .clone()
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Append `record`, refusing an `_id` already present in the collection
fn push_unique(
    collection: Collection,
    records: &mut Vec<Record>,
    mut record: Record,
) -> CartsResult<String> {
    let id = assign_id(&mut record);
    if records.iter().any(|r| r.get(ID_FIELD) == Some(&id)) {
        return Err(CartsError::upstream(
            "memory",
            format!("duplicate key error collection: {} dup key: {{ _id: {} }}", collection, id),
        ));
    }
    records.push(record);
    Ok(id_string(&id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> CartsResult<Vec<Value>> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .cloned()
                    .map(Value::Object)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> CartsResult<Option<Value>> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.iter().find(|r| filter.matches(r)))
            .cloned()
            .map(Value::Object))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> CartsResult<InsertOutcome> {
        let mut collections = self.lock()?;
        let id = push_unique(collection, collections.entry(collection).or_default(), document)?;
        Ok(InsertOutcome::new(id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Map<String, Value>,
        upsert: bool,
    ) -> CartsResult<UpdateOutcome> {
        let mut collections = self.lock()?;
        let records = collections.entry(collection).or_default();

        if let Some(record) = records.iter_mut().find(|r| filter.matches(r)) {
            let mut modified = false;
            for (field, value) in set {
                if record.get(&field) != Some(&value) {
                    record.insert(field, value);
                    modified = true;
                }
            }
            return Ok(UpdateOutcome::matched(modified));
        }

        if !upsert {
            return Ok(UpdateOutcome::unmatched());
        }

        let mut record = filter.seed_fields();
        record.extend(set);
        let id = push_unique(collection, records, record)?;
        Ok(UpdateOutcome::upserted(id))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> CartsResult<DeleteOutcome> {
        let mut collections = self.lock()?;
        let records = collections.entry(collection).or_default();
        match records.iter().position(|r| filter.matches(r)) {
            Some(index) => {
                records.remove(index);
                Ok(DeleteOutcome::new(1))
            }
            None => Ok(DeleteOutcome::new(0)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
