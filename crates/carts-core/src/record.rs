//! # Record Types
//!
//! Collections, identifiers, filters and write outcomes.
//! Records themselves are loosely-typed JSON objects keyed by `_id`.

use crate::error::{CartsError, CartsResult};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field holding a record's identifier
pub const ID_FIELD: &str = "_id";

/// The record collections owned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Parts,
    Reviews,
    Users,
    Orders,
    Payments,
}

impl Collection {
    /// Name of the collection in the database
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Parts => "parts",
            Collection::Reviews => "reviews",
            Collection::Users => "users",
            Collection::Orders => "orders",
            Collection::Payments => "payments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a stored record (24 hex digits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// The underlying object id
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Lowercase hex form, as stored in `_id` of JSON records
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl FromStr for RecordId {
    type Err = CartsError;

    fn from_str(s: &str) -> CartsResult<Self> {
        ObjectId::parse_str(s)
            .map(RecordId)
            .map_err(|_| CartsError::InvalidIdentifier(s.to_string()))
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Selection of records within one collection
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every record
    All,
    /// The record with this identifier
    Id(RecordId),
    /// Records whose top-level `field` equals `value`
    Eq(String, Value),
}

impl Filter {
    /// Equality filter on a top-level field
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Check whether a JSON record satisfies this filter
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => {
                record.get(ID_FIELD).and_then(Value::as_str) == Some(id.to_hex().as_str())
            }
            Filter::Eq(field, value) => record.get(field) == Some(value),
        }
    }

    /// Fields an upsert copies into a newly inserted record
    pub fn seed_fields(&self) -> Map<String, Value> {
        let mut seed = Map::new();
        match self {
            Filter::All => {}
            Filter::Id(id) => {
                seed.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
            }
            Filter::Eq(field, value) => {
                seed.insert(field.clone(), value.clone());
            }
        }
        seed
    }
}

/// Result of inserting one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOutcome {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Result of updating (or upserting) one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateOutcome {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            ..Self::default()
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            ..Self::default()
        }
    }

    pub fn upserted(id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Result of deleting one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Take a request body as a JSON object, or reject it
pub fn as_document(value: Value) -> CartsResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CartsError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
