#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid device id: expected 15 ASCII digits, got {0:?}")]
    InvalidDeviceId(String),
    #[error("frame too short: need at least {need} bytes, got {got}")]
    FrameTooShort { need: usize, got: usize },
}
