#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("device state store unreachable: {0}")]
    Unreachable(String),
    #[error("device state store operation failed: {0}")]
    Backend(String),
}
