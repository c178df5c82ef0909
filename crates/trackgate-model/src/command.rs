use std::fmt;

/// Universal command vocabulary a downstream-protocol command decoder maps
/// inbound server frames onto, before routing them back to an input source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    OutputOn,
    OutputOff,
    Ping,
    /// Odometer reset/override, in meters.
    Odometer(u64),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::OutputOn => write!(f, "OUTPUT ON"),
            Command::OutputOff => write!(f, "OUTPUT OFF"),
            Command::Ping => write!(f, "PING"),
            Command::Odometer(meters) => write!(f, "HODOMETRO:{meters}"),
        }
    }
}
