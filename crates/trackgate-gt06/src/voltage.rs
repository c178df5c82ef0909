use crate::frame::finalize_extended_frame;

/// Builds a GT06 voltage-info packet (protocol `0x94`, sub-protocol `0x00`),
/// carrying only the external voltage reading.
pub fn build_voltage_info_packet(voltage: f64, serial: u16) -> Vec<u8> {
    let voltage_raw = (voltage * 100.0).round() as u16;

    let mut body = Vec::with_capacity(2 + 2 + 2);
    body.push(0x94);
    body.push(0x00);
    body.extend_from_slice(&voltage_raw.to_be_bytes());
    body.extend_from_slice(&serial.to_be_bytes());

    finalize_extended_frame(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_uses_extended_start_and_two_byte_length() {
        let packet = build_voltage_info_packet(3.70, 0);
        assert_eq!(&packet[0..2], &[0x79, 0x79]);
        let len_field = u16::from_be_bytes([packet[2], packet[3]]) as usize;
        // Extended frames carry a 2-byte start plus a 2-byte LEN field before
        // LEN's own count begins, plus the 2-byte terminator after it.
        assert_eq!(len_field + 6, packet.len());
    }

    #[test]
    fn encodes_voltage_as_centivolts() {
        let packet = build_voltage_info_packet(3.70, 0);
        assert_eq!(&packet[4..6], &[0x94, 0x00]);
        let voltage_raw = u16::from_be_bytes([packet[6], packet[7]]);
        assert_eq!(voltage_raw, 370);
    }
}
