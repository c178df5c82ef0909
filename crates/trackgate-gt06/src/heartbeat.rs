use crate::frame::finalize_short_frame;

/// Builds a GT06 heartbeat packet (protocol `0x13`). `acc_status` sets bit 1
/// of `terminal_info`; the remaining bits are fixed per the wire format
/// (bit6, bit2, bit0 set, last-output-status bit7 always 0).
pub fn build_heartbeat_packet(acc_status: bool, serial: u16) -> Vec<u8> {
    let terminal_info = (1 << 6) | (1 << 2) | (u8::from(acc_status) << 1) | 1;

    let mut body = Vec::with_capacity(7 + 2);
    body.push(0x13);
    body.push(terminal_info);
    body.push(0x06); // voltage level
    body.push(0x04); // gsm signal
    body.push(0x00); // alarm
    body.push(0x02); // language
    body.extend_from_slice(&serial.to_be_bytes());

    finalize_short_frame(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::crc_x25;

    #[test]
    fn matches_the_documented_heartbeat_scenario() {
        let packet = build_heartbeat_packet(true, 0);

        let expected_data_for_crc = [0x0A, 0x13, 0x47, 0x06, 0x04, 0x00, 0x02, 0x00, 0x00];
        let expected_crc = crc_x25(&expected_data_for_crc);

        let mut expected = vec![0x78, 0x78];
        expected.extend_from_slice(&expected_data_for_crc);
        expected.extend_from_slice(&expected_crc.to_be_bytes());
        expected.extend_from_slice(&[0x0D, 0x0A]);

        assert_eq!(packet, expected);
    }

    #[test]
    fn acc_status_off_clears_bit_one() {
        let packet = build_heartbeat_packet(false, 0);
        assert_eq!(packet[4], 0x45);
    }
}
