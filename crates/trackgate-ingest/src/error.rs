/// Error taxonomy shared by every input source. `Permanent` failures (store
/// unreachable at startup) are not represented here: the gateway binary
/// surfaces those with `anyhow` at the process boundary instead, since they
/// abort the whole process rather than a single report.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Malformed vendor record: bad device id, missing/zero coordinates.
    /// The single report is dropped; the worker continues.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream request failed or timed out. The worker retries on its next
    /// poll tick; no report is lost beyond the current one.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Unknown output protocol, missing downstream address, missing packet
    /// builder. Logged at error; the single `forward` call becomes a no-op.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("device state store error: {0}")]
    Store(#[from] trackgate_store::StoreError),

    #[error("session error: {0}")]
    Session(#[from] trackgate_session::SessionError),

    #[error("output processor error: {0}")]
    Output(#[from] trackgate_output::OutputError),
}
