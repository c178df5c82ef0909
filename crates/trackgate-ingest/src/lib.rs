//! Capability registry glue between upstream input sources and the session
//! layer: the `InputSource` trait (poller + command handler in one) and the
//! process-start registry that replaces dynamic module/attribute lookup.

mod error;
mod source;

pub use error::IngestError;
pub use source::{InputSource, SourceRegistry};
pub use trackgate_session::CommandHandler;
