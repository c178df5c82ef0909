//! Canonical domain types shared by every crate in the gateway: device
//! identity, the normalized location report produced by input mappers, the
//! per-device state record, and the universal command vocabulary used to
//! route inbound server commands back to an input source.

mod command;
mod device_id;
mod location;
mod state;
mod vendor;

pub use command::Command;
pub use device_id::DeviceId;
pub use location::LocationReport;
pub use state::{protocol_key, telemetry_key, DeviceState, DEFAULT_VOLTAGE};
pub use vendor::VendorRecord;
