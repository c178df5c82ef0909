#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("no packet builder registered for ({0:?}, {1:?})")]
    NoBuilder(String, &'static str),
    #[error("device state store error: {0}")]
    Store(#[from] trackgate_store::StoreError),
    #[error("session error: {0}")]
    Session(#[from] trackgate_session::SessionError),
}
