use redis::{aio::ConnectionManager, AsyncCommands, Client};

use crate::{KvStore, StoreError};

/// `KvStore` backed by a shared Redis instance, using a connection manager
/// so transient disconnects are retried transparently rather than surfacing
/// on every call.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(host: &str, port: u16, password: &str, db: i64) -> Result<Self, StoreError> {
        let auth = if password.is_empty() {
            String::new()
        } else {
            format!(":{password}@")
        };
        let url = format!("redis://{auth}{host}:{port}/{db}");
        tracing::info!(%host, port, db, "connecting to device state store");

        let client = Client::open(url).map_err(|e| StoreError::Unreachable(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        tracing::info!("connected to device state store");
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl KvStore for RedisStore {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.hget(key, field)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn hmget(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<Vec<Option<String>>, StoreError> {
        let mut conn = self.conn.clone();
        conn.hget(key, fields)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.hset(key, field, value)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
