#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no downstream address configured for output protocol {0:?}")]
    UnknownProtocol(String),
    #[error("codec error: {0}")]
    Codec(#[from] trackgate_gt06::CodecError),
    #[error("device state store error: {0}")]
    Store(#[from] trackgate_store::StoreError),
}

/// `true` for the POSIX errno values the original gateway treats as
/// connection loss: bad file descriptor (9), not connected (57), and
/// connection reset by peer (104).
pub fn is_disconnect_worthy(err: &std::io::Error) -> bool {
    use std::io::ErrorKind;
    matches!(
        err.kind(),
        ErrorKind::NotConnected | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset
    ) || matches!(err.raw_os_error(), Some(9) | Some(57) | Some(104))
}
