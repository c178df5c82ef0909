use std::sync::Arc;

use trackgate_model::{protocol_key, telemetry_key, DeviceId};

use crate::{KvStore, StoreError};

/// Typed accessors over a `KvStore`, keyed exactly as the data model
/// documents: `device:<source>:<deviceId>` for per-source telemetry and
/// `device:<deviceId>` for the device-level output protocol assignment.
#[derive(Clone)]
pub struct DeviceStateRepo {
    store: Arc<dyn KvStore>,
}

impl DeviceStateRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn last_timestamp(&self, source: &str, id: &DeviceId) -> Result<Option<i64>, StoreError> {
        let raw = self.store.hget(&telemetry_key(source, id), "last_timestamp").await?;
        Ok(raw.and_then(|s| s.parse().ok()))
    }

    pub async fn set_last_timestamp(
        &self,
        source: &str,
        id: &DeviceId,
        ts: i64,
    ) -> Result<(), StoreError> {
        self.store
            .hset(&telemetry_key(source, id), "last_timestamp", &ts.to_string())
            .await
    }

    pub async fn last_coordinates(
        &self,
        source: &str,
        id: &DeviceId,
    ) -> Result<Option<(f64, f64)>, StoreError> {
        let key = telemetry_key(source, id);
        let vals = self.store.hmget(&key, &["last_lat", "last_lon"]).await?;
        let lat = vals.first().and_then(|v| v.as_ref()).and_then(|s| s.parse().ok());
        let lon = vals.get(1).and_then(|v| v.as_ref()).and_then(|s| s.parse().ok());
        Ok(lat.zip(lon))
    }

    pub async fn last_odometer(&self, source: &str, id: &DeviceId) -> Result<u32, StoreError> {
        let raw = self.store.hget(&telemetry_key(source, id), "last_odometer").await?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or(0))
    }

    /// Persists the new odometer reading together with the coordinates it
    /// was derived from, in one last-writer-wins write per field.
    pub async fn save_position(
        &self,
        source: &str,
        id: &DeviceId,
        lat: f64,
        lon: f64,
        odometer: u32,
    ) -> Result<(), StoreError> {
        let key = telemetry_key(source, id);
        self.store.hset(&key, "last_lat", &lat.to_string()).await?;
        self.store.hset(&key, "last_lon", &lon.to_string()).await?;
        self.store
            .hset(&key, "last_odometer", &odometer.to_string())
            .await
    }

    pub async fn voltage(&self, source: &str, id: &DeviceId) -> Result<Option<f64>, StoreError> {
        let raw = self.store.hget(&telemetry_key(source, id), "voltage").await?;
        Ok(raw.and_then(|s| s.parse().ok()))
    }

    pub async fn set_voltage(&self, source: &str, id: &DeviceId, voltage: f64) -> Result<(), StoreError> {
        self.store
            .hset(&telemetry_key(source, id), "voltage", &voltage.to_string())
            .await
    }

    pub async fn output_protocol(&self, id: &DeviceId) -> Result<Option<String>, StoreError> {
        self.store.hget(&protocol_key(id), "output_protocol").await
    }

    pub async fn set_output_protocol(&self, id: &DeviceId, protocol: &str) -> Result<(), StoreError> {
        self.store.hset(&protocol_key(id), "output_protocol", protocol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    fn repo() -> DeviceStateRepo {
        DeviceStateRepo::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn odometer_defaults_to_zero() {
        let repo = repo();
        let id = DeviceId::normalize("123456789012345");
        assert_eq!(repo.last_odometer("mt02", &id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_position_is_readable_back() {
        let repo = repo();
        let id = DeviceId::normalize("123456789012345");
        repo.save_position("mt02", &id, -23.55, -46.63, 120).await.unwrap();
        assert_eq!(repo.last_odometer("mt02", &id).await.unwrap(), 120);
        assert_eq!(
            repo.last_coordinates("mt02", &id).await.unwrap(),
            Some((-23.55, -46.63))
        );
    }

    #[tokio::test]
    async fn output_protocol_defaults_to_none() {
        let repo = repo();
        let id = DeviceId::normalize("123456789012345");
        assert_eq!(repo.output_protocol(&id).await.unwrap(), None);
        repo.set_output_protocol(&id, "gt06").await.unwrap();
        assert_eq!(repo.output_protocol(&id).await.unwrap(), Some("gt06".into()));
    }
}
