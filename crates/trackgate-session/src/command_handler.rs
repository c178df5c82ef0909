use trackgate_model::{Command, DeviceId};

/// Receives universal commands decoded from a session's inbound reader.
/// Constructor-injected per session rather than looked up dynamically by
/// input-source name, so the session never imports an input module at
/// runtime.
#[async_trait::async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle_command(&self, device_id: &DeviceId, command: Command);
}
