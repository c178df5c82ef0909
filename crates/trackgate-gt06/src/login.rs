use crate::bcd::imei_to_bcd;
use crate::error::CodecError;
use crate::frame::finalize_short_frame;

/// Builds a GT06 login packet (protocol `0x01`) for the 15-digit effective
/// device id. Fails if `imei` is not exactly 15 ASCII digits.
pub fn build_login_packet(imei: &str, serial: u16) -> Result<Vec<u8>, CodecError> {
    let imei_bcd = imei_to_bcd(imei)?;

    let mut body = Vec::with_capacity(1 + 8 + 2);
    body.push(0x01);
    body.extend_from_slice(&imei_bcd);
    body.extend_from_slice(&serial.to_be_bytes());

    Ok(finalize_short_frame(&body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::crc_x25;

    #[test]
    fn matches_the_documented_login_scenario() {
        let packet = build_login_packet("123456789012345", 0).unwrap();

        let expected_data_for_crc = [
            0x0D, 0x01, 0x01, 0x23, 0x45, 0x67, 0x89, 0x01, 0x23, 0x45, 0x00, 0x00,
        ];
        let expected_crc = crc_x25(&expected_data_for_crc);

        let mut expected = vec![0x78, 0x78];
        expected.extend_from_slice(&expected_data_for_crc);
        expected.extend_from_slice(&expected_crc.to_be_bytes());
        expected.extend_from_slice(&[0x0D, 0x0A]);

        assert_eq!(packet, expected);
    }

    #[test]
    fn rejects_non_fifteen_digit_imei() {
        assert!(build_login_packet("123", 0).is_err());
    }
}
