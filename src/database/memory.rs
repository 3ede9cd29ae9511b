use crate::database::KvStore;
use crate::utils::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory `KvStore` over a `BTreeMap`. Backs the unit tests; no
/// durability. The ordered map makes prefix scans a range walk, matching
/// the production store's prefix semantics.
#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: Value) -> Result<bool, AppError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Value>>, AppError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(keys.iter().map(|k| entries.get(k).cloned()).collect())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn incr_f64(&self, key: &str, delta: f64) -> Result<f64, AppError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let current = entries.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0);
        let next = current + delta;
        entries.insert(key.to_string(), serde_json::json!(next));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_nx_reserves_only_once() {
        let kv = MemoryKv::new();
        assert!(kv.set_nx("username:alice", serde_json::json!("u1")).await.unwrap());
        assert!(!kv.set_nx("username:alice", serde_json::json!("u2")).await.unwrap());
        assert_eq!(kv.get("username:alice").await.unwrap(), Some(serde_json::json!("u1")));
    }

    #[tokio::test]
    async fn prefix_scan_does_not_cross_namespaces() {
        let kv = MemoryKv::new();
        kv.set("user:1", serde_json::json!({"id": "1"})).await.unwrap();
        kv.set("username:bob", serde_json::json!("1")).await.unwrap();
        kv.set("userProjects:1", serde_json::json!(["p1"])).await.unwrap();

        let users = kv.get_by_prefix("user:").await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn incr_creates_then_accumulates() {
        let kv = MemoryKv::new();
        assert_eq!(kv.incr_f64("analytics:totalRevenue", 100.0).await.unwrap(), 100.0);
        assert_eq!(kv.incr_f64("analytics:totalRevenue", 20.0).await.unwrap(), 120.0);
    }

    #[tokio::test]
    async fn concurrent_increments_on_a_fresh_key_both_land() {
        let kv = std::sync::Arc::new(MemoryKv::new());

        let a = {
            let kv = kv.clone();
            tokio::spawn(async move { kv.incr_f64("analytics:totalRevenue", 100.0).await })
        };
        let b = {
            let kv = kv.clone();
            tokio::spawn(async move { kv.incr_f64("analytics:totalRevenue", 20.0).await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let total = kv
            .get("analytics:totalRevenue")
            .await
            .unwrap()
            .and_then(|v| v.as_f64());
        assert_eq!(total, Some(120.0));
    }

    #[tokio::test]
    async fn mget_preserves_order_with_gaps() {
        let kv = MemoryKv::new();
        kv.set("project:a", serde_json::json!("a")).await.unwrap();
        kv.set("project:c", serde_json::json!("c")).await.unwrap();

        let got = kv
            .mget(&["project:a".into(), "project:b".into(), "project:c".into()])
            .await
            .unwrap();
        assert_eq!(got, vec![Some(serde_json::json!("a")), None, Some(serde_json::json!("c"))]);
    }
}
