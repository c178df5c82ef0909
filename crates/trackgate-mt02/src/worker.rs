use std::sync::Arc;
use std::time::Duration;

use trackgate_ingest::{IngestError, InputSource};
use trackgate_model::{Command, DeviceId};
use trackgate_output::OutputProcessor;
use trackgate_session::CommandHandler;
use trackgate_store::DeviceStateRepo;

use crate::client::Mt02Client;
use crate::mapper::map_location_data;

const SOURCE: &str = "mt02";

/// A record is new iff there is no prior timestamp, or the new one is
/// strictly greater. Pulled out of the poll loop so the dedup rule itself is
/// testable without a live HTTP client.
fn is_new_report(last_processed: Option<i64>, timestamp: i64) -> bool {
    last_processed.map(|ts| timestamp > ts).unwrap_or(true)
}

/// Polls the MT02 API on a fixed cadence. The dedup check against
/// `last_timestamp` runs here, before the mapper ever sees the record,
/// mirroring the original worker loop rather than the mapper.
pub struct Mt02Worker {
    client: Mt02Client,
    store: DeviceStateRepo,
    output: OutputProcessor,
    poll_interval: Duration,
}

impl Mt02Worker {
    pub fn new(
        client: Mt02Client,
        store: DeviceStateRepo,
        output: OutputProcessor,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            store,
            output,
            poll_interval,
        }
    }

    async fn poll_once(self: &Arc<Self>) {
        let locations = match self.client.fetch_all().await {
            Ok(locations) => locations,
            Err(err) => {
                tracing::warn!(error = %err, "error in worker loop");
                return;
            }
        };

        if locations.is_empty() {
            tracing::info!("no location data retrieved this time");
            return;
        }
        tracing::info!(count = locations.len(), "fetched locations for devices");

        for (raw_device_id, record) in locations {
            let device_id = DeviceId::normalize(&raw_device_id);

            let last_processed = match self.store.last_timestamp(SOURCE, &device_id).await {
                Ok(ts) => ts,
                Err(err) => {
                    tracing::warn!(device_id = %device_id, error = %err, "failed to read last processed timestamp");
                    continue;
                }
            };

            if !is_new_report(last_processed, record.timestamp) {
                tracing::info!(device_id = %device_id, "no new location for device");
                continue;
            }

            if let Err(err) = self.store.set_last_timestamp(SOURCE, &device_id, record.timestamp).await {
                tracing::warn!(device_id = %device_id, error = %err, "failed to persist last processed timestamp");
                continue;
            }
            tracing::info!(device_id = %device_id, "new location for device");

            let this = self.clone();
            tokio::spawn(async move {
                this.process_location(&device_id, &record).await;
            });
        }
    }

    async fn process_location(self: &Arc<Self>, device_id: &DeviceId, record: &trackgate_model::VendorRecord) {
        let report = match map_location_data(&self.store, device_id, record).await {
            Ok(Some(report)) => report,
            Ok(None) => return,
            Err(err) => {
                tracing::error!(device_id = %device_id, error = %err, "failed to map location data");
                return;
            }
        };

        let handler: Arc<dyn CommandHandler> = self.clone();
        if let Err(err) = self.output.forward(device_id, &report, SOURCE, handler).await {
            tracing::error!(device_id = %device_id, error = %err, "failed to forward location report");
        }
    }
}

#[async_trait::async_trait]
impl CommandHandler for Mt02Worker {
    /// MT02 is a read-only polling source in this revision: there is no
    /// upstream command channel to relay a decoded command onto, so inbound
    /// commands are logged and otherwise dropped.
    async fn handle_command(&self, device_id: &DeviceId, command: Command) {
        tracing::info!(device_id = %device_id, %command, "received inbound command with no upstream channel to relay it to");
    }
}

#[async_trait::async_trait]
impl InputSource for Mt02Worker {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn run(self: Arc<Self>) -> Result<(), IngestError> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_prior_timestamp_is_always_new() {
        assert!(is_new_report(None, 1_700_000_000));
    }

    #[test]
    fn strictly_greater_timestamp_is_new() {
        assert!(is_new_report(Some(100), 101));
        assert!(!is_new_report(Some(100), 100));
        assert!(!is_new_report(Some(100), 99));
    }
}
