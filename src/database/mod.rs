pub mod memory;

use crate::utils::AppError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub use memory::MemoryKv;

/// Opaque key-value store the whole backend persists through.
///
/// The namespace is flat: `user:<id>`, `project:<id>`, `developer:<id>`,
/// `userProjects:<userId>`, plus scalar keys. Each call is atomic for its
/// own key(s); there is no cross-key transaction.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError>;

    /// Sets the key only if it does not exist yet. Returns `false` when the
    /// key was already present. This is the reservation primitive behind
    /// username/email uniqueness and the one-time initialization flag.
    async fn set_nx(&self, key: &str, value: Value) -> Result<bool, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Fetches several keys at once, preserving input order. Missing keys
    /// yield `None` rather than an error.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Value>>, AppError>;

    /// Returns the values of every key starting with `prefix`.
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError>;

    /// Atomically adds `delta` to a numeric key (creating it at `delta` when
    /// absent) and returns the new value. Backs the revenue counter so
    /// concurrent approvals cannot lose an increment.
    async fn incr_f64(&self, key: &str, delta: f64) -> Result<f64, AppError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct KvEntry {
    key: String,
    value: Value,
}

const KV_COLLECTION: &str = "kv_store";

/// MongoDB-backed implementation. A single collection of `{key, value}`
/// documents with a unique index on `key`.
#[derive(Clone)]
pub struct MongoKv {
    db: Database,
}

impl MongoKv {
    pub async fn new(uri: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Bounded timeouts so a dead store surfaces as a transient failure
        // instead of hanging the request.
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("Marketplace");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let store = Self { db };
        store.ensure_indexes().await?;

        Ok(store)
    }

    /// Unique index on `key` — lookups are point reads and `set_nx` can rely
    /// on the duplicate-key error for atomic reservations.
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.entries().create_index(index).await {
            Ok(_) => log::info!("   ✅ Index created: kv_store(key) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        Ok(())
    }

    fn entries(&self) -> Collection<KvEntry> {
        self.db.collection(KV_COLLECTION)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}

#[async_trait]
impl KvStore for MongoKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let entry = self
            .entries()
            .find_one(doc! { "key": key })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        let entry = KvEntry { key: key.to_string(), value };

        self.entries()
            .replace_one(doc! { "key": key }, &entry)
            .upsert(true)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn set_nx(&self, key: &str, value: Value) -> Result<bool, AppError> {
        let entry = KvEntry { key: key.to_string(), value };

        match self.entries().insert_one(&entry).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries()
            .delete_one(doc! { "key": key })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Value>>, AppError> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let cursor = self
            .entries()
            .find(doc! { "key": { "$in": keys } })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found: Vec<KvEntry> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut by_key: HashMap<String, Value> =
            found.into_iter().map(|e| (e.key, e.value)).collect();

        Ok(keys.iter().map(|k| by_key.remove(k)).collect())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        // Prefixes are fixed namespace tags (`user:`, `project:`, ...) with no
        // regex metacharacters.
        let cursor = self
            .entries()
            .find(doc! { "key": { "$regex": format!("^{}", prefix) } })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found: Vec<KvEntry> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.into_iter().map(|e| e.value).collect())
    }

    async fn incr_f64(&self, key: &str, delta: f64) -> Result<f64, AppError> {
        // Two concurrent upserts on a missing key can both miss the filter
        // and race the insert; the unique index rejects one with a
        // duplicate-key error, and a second attempt then matches the
        // winner's document.
        let mut last_err: Option<mongodb::error::Error> = None;

        for _ in 0..2 {
            match self
                .entries()
                .find_one_and_update(
                    doc! { "key": key },
                    doc! { "$inc": { "value": delta } },
                )
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await
            {
                Ok(Some(updated)) => {
                    return updated
                        .value
                        .as_f64()
                        .ok_or_else(|| AppError::Database(format!("non-numeric value under {}", key)));
                }
                Ok(None) => {
                    return Err(AppError::Database(format!(
                        "upsert returned no document for {}",
                        key
                    )));
                }
                Err(e) if is_duplicate_key(&e) => {
                    last_err = Some(e);
                }
                Err(e) => return Err(AppError::Database(e.to_string())),
            }
        }

        Err(AppError::Database(
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("increment failed for {}", key)),
        ))
    }
}
