//! The GT06 binary packet codec: frame encoding for outbound login,
//! heartbeat, location and voltage-info packets, CRC-16/X25, BCD device-id
//! packing, and inbound command-frame decoding.

mod bcd;
mod command;
mod crc;
mod error;
mod frame;
mod heartbeat;
mod location;
mod login;
mod voltage;

pub use bcd::{bcd_to_digits, imei_to_bcd};
pub use command::decode_command_frame;
pub use crc::crc_x25;
pub use error::CodecError;
pub use heartbeat::build_heartbeat_packet;
pub use location::build_location_packet;
pub use login::build_login_packet;
pub use voltage::build_voltage_info_packet;

/// The four location-packet protocol numbers this codec knows how to build.
pub const LOCATION_PROTOCOLS: [u8; 4] = [0x12, 0x22, 0x32, 0xA0];
