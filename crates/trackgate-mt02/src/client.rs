use std::time::{SystemTime, UNIX_EPOCH};

use trackgate_ingest::IngestError;
use trackgate_model::VendorRecord;

/// HTTP client for the MT02 fleet-tracking API. Every request carries an
/// `api_token` header and a freshly generated `timestamp` header (decimal
/// seconds) — the timestamp header authenticates the request, it is not the
/// location's own timestamp.
pub struct Mt02Client {
    base_url: String,
    api_token: String,
    http: reqwest::Client,
}

impl Mt02Client {
    pub fn new(base_url: String, api_token: String) -> Result<Self, IngestError> {
        if api_token.is_empty() {
            return Err(IngestError::Configuration("MT02 API token must be provided".into()));
        }
        Ok(Self {
            base_url,
            api_token,
            http: reqwest::Client::new(),
        })
    }

    fn timestamp_header() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string()
    }

    /// Lists the device ids this account can see. The upstream endpoint is
    /// not documented beyond its presence; a deployment without a real
    /// listing endpoint configured reports no devices rather than erroring.
    pub async fn fetch_devices(&self) -> Result<Vec<String>, IngestError> {
        let url = format!("{}/devices", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("api_token", &self.api_token)
            .header("timestamp", Self::timestamp_header())
            .send()
            .await
            .map_err(|e| IngestError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Upstream(format!(
                "fetch_devices: unexpected status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| IngestError::Upstream(e.to_string()))
    }

    pub async fn fetch_device_location(&self, device_id: &str) -> Result<VendorRecord, IngestError> {
        let url = format!("{}/tag", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("api_token", &self.api_token)
            .header("timestamp", Self::timestamp_header())
            .query(&[("ids", device_id)])
            .send()
            .await
            .map_err(|e| IngestError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Upstream(format!(
                "fetch_device_location({device_id}): unexpected status {}",
                response.status()
            )));
        }

        response
            .json::<VendorRecord>()
            .await
            .map_err(|e| IngestError::Upstream(e.to_string()))
    }

    /// Mirrors the original client: lists devices, then fetches each
    /// location serially, one request at a time. Any single device's fetch
    /// failing is logged and skipped rather than aborting the whole tick.
    pub async fn fetch_all(&self) -> Result<Vec<(String, VendorRecord)>, IngestError> {
        let devices = self.fetch_devices().await?;
        if devices.is_empty() {
            return Ok(Vec::new());
        }

        let mut all = Vec::with_capacity(devices.len());
        for device_id in devices {
            match self.fetch_device_location(&device_id).await {
                Ok(record) => all.push((device_id, record)),
                Err(err) => {
                    tracing::warn!(device_id = %device_id, error = %err, "error fetching location for device");
                }
            }
        }
        Ok(all)
    }
}
