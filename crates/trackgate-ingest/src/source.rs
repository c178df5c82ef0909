use std::sync::Arc;

use trackgate_session::CommandHandler;

use crate::error::IngestError;

/// Capability registered for one vendor source at process start (Design
/// Notes: "dynamic worker dispatch" replaced by a capability registry).
///
/// An `InputSource` is both a poller (`run`) and the `CommandHandler`
/// sessions dispatch inbound commands back to, so `trackgate-session` never
/// imports an input module at runtime — it only holds the `Arc<dyn
/// CommandHandler>` it was constructed with.
#[async_trait::async_trait]
pub trait InputSource: CommandHandler {
    /// Stable name used for config lookups (`WORKERS_INPUT_SOURCE` keys) and
    /// as the `inputSource` tag on sessions this source drives.
    fn name(&self) -> &'static str;

    /// Runs the source's poll loop until cancelled or the process exits.
    /// Transient failures are expected to be caught and logged inside this
    /// loop rather than propagated, matching the original worker's
    /// catch-log-continue behavior; a returned `Err` ends the loop entirely
    /// and is treated as fatal for this source by the caller.
    async fn run(self: Arc<Self>) -> Result<(), IngestError>;
}

/// The process-start capability registry: one `InputSource` per configured
/// vendor, looked up by name instead of imported by module path.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn InputSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Arc<dyn InputSource>) {
        self.sources.push(source);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn InputSource>> {
        self.sources.iter().find(|s| s.name() == name).cloned()
    }

    pub fn all(&self) -> &[Arc<dyn InputSource>] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackgate_model::{Command, DeviceId};

    struct StubSource;

    #[async_trait::async_trait]
    impl CommandHandler for StubSource {
        async fn handle_command(&self, _device_id: &DeviceId, _command: Command) {}
    }

    #[async_trait::async_trait]
    impl InputSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn run(self: Arc<Self>) -> Result<(), IngestError> {
            Ok(())
        }
    }

    #[test]
    fn lookup_by_name_finds_a_registered_source() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubSource));
        assert!(registry.get("stub").is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn unknown_name_returns_none() {
        let registry = SourceRegistry::new();
        assert!(registry.get("stub").is_none());
    }
}
