//! # Redis
//!
//! Document store backing all four collections.
//!
//! ## Requirements
//!
//! - Four flat collections: signals, zones, users, notifications
//! - Lookup/overwrite/merge/delete by document id
//! - Small dataset, at most a few hundred documents per collection
//!
//! ## Implementation
//!
//! - One Redis hash per collection
//! - Field is the document id, value is the JSON-encoded record
//! - Merge updates are read-modify-write of the single field; there is no
//!   cross-document atomicity, so two writers racing on the same collection
//!   can observe stale snapshots
use std::collections::HashMap;
use std::time::Duration;

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Signals,
    Zones,
    Users,
    Notifications,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Signals => "signals",
            Collection::Zones => "zones",
            Collection::Users => "users",
            Collection::Notifications => "notifications",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("malformed document: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Contract the repository layer is written against. Documents are plain
/// JSON objects keyed by collection and document id.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    /// Full overwrite/create.
    async fn set(&self, collection: Collection, id: &str, record: &Value)
        -> Result<(), StoreError>;

    /// Merges the supplied top-level fields into the stored document and
    /// returns the post-update record, or `None` if the document is absent.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<Option<Value>, StoreError>;

    /// Returns whether a document was actually removed.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError>;

    async fn count(&self, collection: Collection) -> Result<usize, StoreError>;
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Self {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let client = Client::open(redis_url).unwrap();
        let connection = client
            .get_connection_manager_with_config(config)
            .await
            .unwrap();

        Self { connection }
    }
}

impl DocumentStore for RedisStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: HashMap<String, String> = connection.hgetall(collection.name()).await?;

        raw.into_values()
            .map(|encoded| Ok(serde_json::from_str(&encoded)?))
            .collect()
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(collection.name(), id).await?;

        match raw {
            Some(encoded) => Ok(Some(serde_json::from_str(&encoded)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        collection: Collection,
        id: &str,
        record: &Value,
    ) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let encoded = serde_json::to_string(record)?;
        let _: () = connection.hset(collection.name(), id, encoded).await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        let Some(mut record) = self.get(collection, id).await? else {
            return Ok(None);
        };

        if let Some(object) = record.as_object_mut() {
            for (key, value) in fields {
                object.insert(key.clone(), value.clone());
            }
        }

        self.set(collection, id, &record).await?;
        Ok(Some(record))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let removed: usize = connection.hdel(collection.name(), id).await?;

        Ok(removed > 0)
    }

    async fn count(&self, collection: Collection) -> Result<usize, StoreError> {
        let mut connection = self.connection.clone();
        let count: usize = connection.hlen(collection.name()).await?;

        Ok(count)
    }
}
