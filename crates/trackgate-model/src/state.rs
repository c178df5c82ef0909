use crate::DeviceId;

/// Per-device telemetry state, addressed by `device:<source>:<deviceId>` in
/// the device state store, plus the output-protocol assignment addressed by
/// `device:<deviceId>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceState {
    pub last_timestamp: Option<i64>,
    pub last_lat: Option<f64>,
    pub last_lon: Option<f64>,
    pub last_odometer: u32,
    pub voltage: Option<f64>,
    pub output_protocol: Option<String>,
}

/// Default voltage reported when none has ever been persisted for a device.
pub const DEFAULT_VOLTAGE: f64 = 1.11;

/// Key for a source-scoped device telemetry hash: `device:<source>:<id>`.
pub fn telemetry_key(source: &str, device_id: &DeviceId) -> String {
    format!("device:{source}:{device_id}")
}

/// Key for the device-level output-protocol hash: `device:<id>`.
pub fn protocol_key(device_id: &DeviceId) -> String {
    format!("device:{device_id}")
}
