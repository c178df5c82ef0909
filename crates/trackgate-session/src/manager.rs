use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use trackgate_model::DeviceId;
use trackgate_store::DeviceStateRepo;

use crate::command_handler::CommandHandler;
use crate::error::SessionError;
use crate::session::{PacketType, Session};

/// Registry of sessions keyed by device id. Creation is lazy: `get_or_create`
/// never connects; the session connects lazily on its first `send_data`.
#[derive(Clone)]
pub struct SessionsManager {
    sessions: Arc<DashMap<DeviceId, Arc<Session>>>,
    addresses: Arc<HashMap<String, (String, u16)>>,
    store: DeviceStateRepo,
}

impl SessionsManager {
    pub fn new(addresses: HashMap<String, (String, u16)>, store: DeviceStateRepo) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            addresses: Arc::new(addresses),
            store,
        }
    }

    pub fn get_or_create(
        &self,
        device_id: &DeviceId,
        input_source: &str,
        output_protocol: &str,
        command_handler: Arc<dyn CommandHandler>,
    ) -> Arc<Session> {
        self.sessions
            .entry(device_id.clone())
            .or_insert_with(|| {
                Session::new(
                    device_id.clone(),
                    input_source.to_string(),
                    output_protocol.to_string(),
                    self.addresses.clone(),
                    self.store.clone(),
                    command_handler,
                )
            })
            .clone()
    }

    pub async fn remove(&self, device_id: &DeviceId) {
        if let Some((_, session)) = self.sessions.remove(device_id) {
            session.disconnect().await;
        }
    }

    /// Advisory liveness check: a session is present and reports itself
    /// connected. A roundtrip would be required for true liveness.
    pub fn exists(&self, device_id: &DeviceId) -> bool {
        self.sessions
            .get(device_id)
            .map(|s| s.is_connected())
            .unwrap_or(false)
    }

    pub async fn send(
        &self,
        device_id: &DeviceId,
        input_source: &str,
        output_protocol: &str,
        bytes: &[u8],
        packet_type: PacketType,
        command_handler: Arc<dyn CommandHandler>,
    ) -> Result<(), SessionError> {
        let session = self.get_or_create(device_id, input_source, output_protocol, command_handler);
        session.send_data(bytes, output_protocol, packet_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackgate_store::InMemoryStore;

    struct NoopHandler;

    #[async_trait::async_trait]
    impl CommandHandler for NoopHandler {
        async fn handle_command(&self, _device_id: &DeviceId, _command: trackgate_model::Command) {}
    }

    fn manager() -> SessionsManager {
        SessionsManager::new(HashMap::new(), DeviceStateRepo::new(Arc::new(InMemoryStore::new())))
    }

    #[test]
    fn exists_is_false_for_unknown_device() {
        let manager = manager();
        let id = DeviceId::normalize("123456789012345");
        assert!(!manager.exists(&id));
    }

    #[tokio::test]
    async fn get_or_create_returns_the_same_session_on_repeat_calls() {
        let manager = manager();
        let id = DeviceId::normalize("123456789012345");
        let handler: Arc<dyn CommandHandler> = Arc::new(NoopHandler);
        let a = manager.get_or_create(&id, "mt02", "gt06", handler.clone());
        let b = manager.get_or_create(&id, "mt02", "gt06", handler);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn remove_drops_the_session_from_the_registry() {
        let manager = manager();
        let id = DeviceId::normalize("123456789012345");
        let handler: Arc<dyn CommandHandler> = Arc::new(NoopHandler);
        manager.get_or_create(&id, "mt02", "gt06", handler);
        manager.remove(&id).await;
        assert!(!manager.exists(&id));
    }
}
