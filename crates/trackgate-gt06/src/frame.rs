use crate::crc::crc_x25;

const SHORT_START: [u8; 2] = [0x78, 0x78];
const EXTENDED_START: [u8; 2] = [0x79, 0x79];
const TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Wraps `body` (protocol byte through serial number, inclusive) in a short
/// `78 78` frame: a 1-byte LEN, the body, the CRC-16/X25 over `LEN‖body`, and
/// the `0D 0A` terminator. LEN counts every byte after itself up to and
/// including the CRC.
pub fn finalize_short_frame(body: &[u8]) -> Vec<u8> {
    let len = (body.len() + 2) as u8;
    let mut data_for_crc = Vec::with_capacity(1 + body.len());
    data_for_crc.push(len);
    data_for_crc.extend_from_slice(body);

    let crc = crc_x25(&data_for_crc);

    let mut packet = Vec::with_capacity(2 + data_for_crc.len() + 2 + 2);
    packet.extend_from_slice(&SHORT_START);
    packet.extend_from_slice(&data_for_crc);
    packet.extend_from_slice(&crc.to_be_bytes());
    packet.extend_from_slice(&TERMINATOR);
    packet
}

/// Same as [`finalize_short_frame`] but for `79 79` extended frames, whose
/// LEN field is a 2-byte big-endian integer.
pub fn finalize_extended_frame(body: &[u8]) -> Vec<u8> {
    let len = (body.len() + 2) as u16;
    let mut data_for_crc = Vec::with_capacity(2 + body.len());
    data_for_crc.extend_from_slice(&len.to_be_bytes());
    data_for_crc.extend_from_slice(body);

    let crc = crc_x25(&data_for_crc);

    let mut packet = Vec::with_capacity(2 + data_for_crc.len() + 2 + 2);
    packet.extend_from_slice(&EXTENDED_START);
    packet.extend_from_slice(&data_for_crc);
    packet.extend_from_slice(&crc.to_be_bytes());
    packet.extend_from_slice(&TERMINATOR);
    packet
}
