use trackgate_model::Command;

/// Decodes a server-originated `78 78 | LEN | ...` command frame into the
/// universal command vocabulary. The ASCII command key lives at byte offset
/// 5 for `LEN − 4` bytes; unknown or malformed keys map to `None`.
pub fn decode_command_frame(frame: &[u8]) -> Option<Command> {
    if frame.len() < 6 {
        return None;
    }
    let len = frame[2] as usize;
    let command_length = len.checked_sub(4)?;
    let start = 5;
    let end = start.checked_add(command_length)?;
    if end > frame.len() {
        return None;
    }
    let key = String::from_utf8_lossy(&frame[start..end]).into_owned();
    map_command_key(&key)
}

fn map_command_key(key: &str) -> Option<Command> {
    match key {
        "RELAY,1#" | "DYD,000000#" => Some(Command::OutputOn),
        "RELAY,0#" | "HFYD,000000#" => Some(Command::OutputOff),
        "GPRS,GET,LOCATION#" => Some(Command::Ping),
        _ => {
            let kilometers = key.strip_prefix("MILEAGE ON,")?.strip_suffix('#')?;
            let kilometers: u64 = kilometers.parse().ok()?;
            Some(Command::Odometer(kilometers * 1000))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_for(key: &str) -> Vec<u8> {
        let len = key.len() + 4;
        let mut frame = vec![0x78, 0x78, len as u8, 0x80, 0x08];
        frame.extend_from_slice(key.as_bytes());
        frame.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x0D, 0x0A]);
        frame
    }

    #[test]
    fn maps_every_documented_key() {
        assert_eq!(decode_command_frame(&frame_for("RELAY,1#")), Some(Command::OutputOn));
        assert_eq!(decode_command_frame(&frame_for("DYD,000000#")), Some(Command::OutputOn));
        assert_eq!(decode_command_frame(&frame_for("RELAY,0#")), Some(Command::OutputOff));
        assert_eq!(decode_command_frame(&frame_for("HFYD,000000#")), Some(Command::OutputOff));
        assert_eq!(
            decode_command_frame(&frame_for("GPRS,GET,LOCATION#")),
            Some(Command::Ping)
        );
        assert_eq!(
            decode_command_frame(&frame_for("MILEAGE ON,42#")),
            Some(Command::Odometer(42_000))
        );
    }

    #[test]
    fn matches_the_documented_relay_scenario() {
        // content "RELAY,1#" maps to the universal OUTPUT ON command.
        assert_eq!(decode_command_frame(&frame_for("RELAY,1#")), Some(Command::OutputOn));
    }

    #[test]
    fn unknown_string_yields_no_command() {
        assert_eq!(decode_command_frame(&frame_for("UNKNOWN#")), None);
    }

    #[test]
    fn non_numeric_mileage_yields_no_command() {
        assert_eq!(decode_command_frame(&frame_for("MILEAGE ON,abc#")), None);
    }
}
