use dashmap::DashMap;

use crate::{KvStore, StoreError};

/// In-memory `KvStore`, used by default and by every test in this workspace.
#[derive(Default)]
pub struct InMemoryStore {
    rows: DashMap<String, DashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStore for InMemoryStore {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .rows
            .get(key)
            .and_then(|row| row.get(field).map(|v| v.clone())))
    }

    async fn hmget(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<Vec<Option<String>>, StoreError> {
        let row = self.rows.get(key);
        Ok(fields
            .iter()
            .map(|f| row.as_ref().and_then(|r| r.get(*f).map(|v| v.clone())))
            .collect())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let row = self.rows.entry(key.to_string()).or_default();
        row.insert(field.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrips_a_single_field() {
        let store = InMemoryStore::new();
        store.hset("device:mt02:1", "last_odometer", "42").await.unwrap();
        let v = store.hget("device:mt02:1", "last_odometer").await.unwrap();
        assert_eq!(v.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn hmget_returns_none_for_missing_fields() {
        let store = InMemoryStore::new();
        store.hset("device:mt02:1", "last_lat", "-23.55").await.unwrap();
        let vals = store
            .hmget("device:mt02:1", &["last_lat", "last_lon"])
            .await
            .unwrap();
        assert_eq!(vals, vec![Some("-23.55".to_string()), None]);
    }

    #[tokio::test]
    async fn missing_key_yields_none_not_error() {
        let store = InMemoryStore::new();
        let v = store.hget("device:mt02:nobody", "voltage").await.unwrap();
        assert_eq!(v, None);
    }
}
