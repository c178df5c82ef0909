//! MT02 input source (C3): HTTP client, vendor-record-to-`LocationReport`
//! mapper, and the polling worker that drives both against the session
//! layer through `trackgate-output`.

mod client;
mod mapper;
mod worker;

pub use client::Mt02Client;
pub use mapper::{haversine_meters, map_location_data};
pub use worker::Mt02Worker;
