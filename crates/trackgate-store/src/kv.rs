use crate::StoreError;

/// Abstract per-key hash map. Implementations may be in-memory (tests) or a
/// shared key/value service in production. No TTL is required; compound
/// read-compute-write sequences are performed by the caller without
/// cross-field atomicity — acceptable because each device is updated from a
/// single input worker (last-writer-wins).
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    async fn hmget(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<Vec<Option<String>>, StoreError>;

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;
}
