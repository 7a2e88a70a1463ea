//! # MongoDB Store
//!
//! `DocumentStore` over one MongoDB database. JSON bodies go in as BSON
//! documents; records come back as relaxed extended JSON with `_id`
//! rendered as a hex string.

use crate::config::MongoConfig;
use async_trait::async_trait;
use bson::{Bson, Document};
use carts_core::{
    CartsError, CartsResult, Collection, DeleteOutcome, DocumentStore, Filter, InsertOutcome,
    UpdateOutcome, ID_FIELD,
};
use futures::TryStreamExt;
use mongodb::{Client, Database};
use serde_json::{Map, Value};
use tracing::{info, instrument};

const SERVICE: &str = "mongodb";

fn db_error(e: mongodb::error::Error) -> CartsError {
    CartsError::upstream(SERVICE, e)
}

/// MongoDB-backed record store
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect and ping the database once so startup fails fast
    pub async fn connect(config: &MongoConfig) -> CartsResult<Self> {
        let client = Client::with_uri_str(&config.uri).await.map_err(db_error)?;
        let database = client.database(&config.database);

        let mut ping = Document::new();
        ping.insert("ping", 1);
        database.run_command(ping).await.map_err(db_error)?;

        info!("Connected to MongoDB database {}", config.database);
        Ok(Self { client, database })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip_all, fields(collection = %collection))]
    async fn find(&self, collection: Collection, filter: &Filter) -> CartsResult<Vec<Value>> {
        let documents: Vec<Document> = self
            .collection(collection)
            .find(to_filter(filter)?)
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)?;

        Ok(documents.into_iter().map(to_json).collect())
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> CartsResult<Option<Value>> {
        let document = self
            .collection(collection)
            .find_one(to_filter(filter)?)
            .await
            .map_err(db_error)?;

        Ok(document.map(to_json))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn insert_one(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> CartsResult<InsertOutcome> {
        let result = self
            .collection(collection)
            .insert_one(to_document(document)?)
            .await
            .map_err(db_error)?;

        Ok(InsertOutcome::new(id_string(&result.inserted_id)))
    }

    #[instrument(skip_all, fields(collection = %collection, upsert = upsert))]
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Map<String, Value>,
        upsert: bool,
    ) -> CartsResult<UpdateOutcome> {
        let mut update = Document::new();
        update.insert("$set", to_document(set)?);

        let result = self
            .collection(collection)
            .update_one(to_filter(filter)?, update)
            .upsert(upsert)
            .await
            .map_err(db_error)?;

        let upserted_id = result.upserted_id.as_ref().map(id_string);
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> CartsResult<DeleteOutcome> {
        let result = self
            .collection(collection)
            .delete_one(to_filter(filter)?)
            .await
            .map_err(db_error)?;

        Ok(DeleteOutcome::new(result.deleted_count))
    }

    fn backend_name(&self) -> &'static str {
        SERVICE
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}

// =============================================================================
// JSON <-> BSON
// =============================================================================

fn to_document(map: Map<String, Value>) -> CartsResult<Document> {
    bson::to_document(&map).map_err(|e| CartsError::InvalidDocument(e.to_string()))
}

fn to_filter(filter: &Filter) -> CartsResult<Document> {
    let mut document = Document::new();
    match filter {
        Filter::All => {}
        Filter::Id(id) => {
            document.insert(ID_FIELD, id.object_id());
        }
        Filter::Eq(field, value) => {
            let value =
                bson::to_bson(value).map_err(|e| CartsError::InvalidDocument(e.to_string()))?;
            document.insert(field.clone(), value);
        }
    }
    Ok(document)
}

fn to_json(mut document: Document) -> Value {
    if let Ok(oid) = document.get_object_id(ID_FIELD) {
        document.insert(ID_FIELD, oid.to_hex());
    }
    Bson::Document(document).into_relaxed_extjson()
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
