//! Output protocol registry (C6): turns a decoded location report into a
//! wire packet for the device's downstream session.

mod error;
mod processor;
mod protocol;

pub use error::OutputError;
pub use processor::OutputProcessor;
pub use protocol::{Gt06Protocol, OutputProtocol};
