use std::collections::HashMap;
use std::sync::Arc;

use trackgate_model::{DeviceId, LocationReport};
use trackgate_session::{CommandHandler, PacketType, SessionsManager};
use trackgate_store::DeviceStateRepo;

use crate::error::OutputError;
use crate::protocol::OutputProtocol;

/// Single facade input sources call to emit a location report: resolves the
/// device's output protocol, builds a packet, logs it, and hands it to the
/// sessions manager for transmission.
#[derive(Clone)]
pub struct OutputProcessor {
    protocols: HashMap<&'static str, Arc<dyn OutputProtocol>>,
    default_protocol: String,
    store: DeviceStateRepo,
    sessions: SessionsManager,
}

impl OutputProcessor {
    pub fn new(
        protocols: Vec<Arc<dyn OutputProtocol>>,
        default_protocol: String,
        store: DeviceStateRepo,
        sessions: SessionsManager,
    ) -> Self {
        let protocols = protocols.into_iter().map(|p| (p.name(), p)).collect();
        Self {
            protocols,
            default_protocol,
            store,
            sessions,
        }
    }

    /// Serial numbers are fixed at 0 in this revision; the registry shape
    /// already allows per-session monotonic serials without a surface change.
    const SERIAL: u16 = 0;

    pub async fn forward(
        &self,
        device_id: &DeviceId,
        report: &LocationReport,
        input_source: &str,
        command_handler: Arc<dyn CommandHandler>,
    ) -> Result<(), OutputError> {
        let protocol_name = self.resolve_output_protocol(device_id).await?;

        let Some(protocol) = self.protocols.get(protocol_name.as_str()) else {
            tracing::error!(device_id = %device_id, protocol = %protocol_name, "no builder registered for output protocol");
            return Ok(());
        };

        let packet = protocol.build_location_packet(report, Self::SERIAL);
        tracing::debug!(
            device_id = %device_id,
            protocol = %protocol_name,
            packet = %protocol.render_log(&packet),
            "built location packet"
        );

        self.sessions
            .send(
                device_id,
                input_source,
                &protocol_name,
                &packet,
                PacketType::Location,
                command_handler,
            )
            .await?;
        Ok(())
    }

    async fn resolve_output_protocol(&self, device_id: &DeviceId) -> Result<String, OutputError> {
        if let Some(protocol) = self.store.output_protocol(device_id).await? {
            return Ok(protocol);
        }
        self.store
            .set_output_protocol(device_id, &self.default_protocol)
            .await?;
        Ok(self.default_protocol.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Gt06Protocol;
    use std::collections::HashMap as StdHashMap;
    use trackgate_model::Command;
    use trackgate_store::InMemoryStore;

    struct NoopHandler;

    #[async_trait::async_trait]
    impl CommandHandler for NoopHandler {
        async fn handle_command(&self, _device_id: &DeviceId, _command: Command) {}
    }

    fn processor() -> OutputProcessor {
        let store = DeviceStateRepo::new(Arc::new(InMemoryStore::new()));
        let sessions = SessionsManager::new(StdHashMap::new(), store.clone());
        let gt06: Arc<dyn OutputProtocol> = Arc::new(Gt06Protocol::new(0xA0).unwrap());
        OutputProcessor::new(vec![gt06], "gt06".to_string(), store, sessions)
    }

    #[tokio::test]
    async fn resolves_and_persists_the_default_protocol_on_first_observation() {
        let processor = processor();
        let id = DeviceId::normalize("123456789012345");
        let resolved = processor.resolve_output_protocol(&id).await.unwrap();
        assert_eq!(resolved, "gt06");
        assert_eq!(processor.store.output_protocol(&id).await.unwrap(), Some("gt06".to_string()));
    }

    #[tokio::test]
    async fn unregistered_protocol_is_a_silent_no_op() {
        let processor = processor();
        let id = DeviceId::normalize("123456789012345");
        processor
            .store
            .set_output_protocol(&id, "unknown-protocol")
            .await
            .unwrap();

        let report = LocationReport {
            timestamp: chrono::Utc::now(),
            latitude: -23.55,
            longitude: -46.63,
            satellites: 6,
            speed_kmh: 0,
            direction: 0,
            gps_fixed: false,
            acc_status: true,
            gps_odometer: 0,
            voltage: 1.11,
        };

        let handler: Arc<dyn CommandHandler> = Arc::new(NoopHandler);
        let result = processor.forward(&id, &report, "mt02", handler).await;
        assert!(result.is_ok());
    }
}
