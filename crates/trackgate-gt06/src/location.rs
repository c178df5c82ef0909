use chrono::{Datelike, Timelike};
use trackgate_model::LocationReport;

use crate::frame::finalize_short_frame;

/// Describes one location packet variant's LBS/status/odometer/voltage
/// suffix layout, so the encoder has no per-protocol branching (see the
/// per-protocol descriptor table in the data model).
#[derive(Clone, Copy, Debug)]
struct SuffixLayout {
    mnc_width: usize,
    lac_width: usize,
    cell_id_width: usize,
    has_status_block: bool,
    has_voltage: bool,
    reserved_zeros: usize,
}

const fn layout_for(protocol: u8) -> Option<SuffixLayout> {
    match protocol {
        0x12 => Some(SuffixLayout {
            mnc_width: 1,
            lac_width: 2,
            cell_id_width: 3,
            has_status_block: false,
            has_voltage: false,
            reserved_zeros: 0,
        }),
        0x22 => Some(SuffixLayout {
            mnc_width: 1,
            lac_width: 2,
            cell_id_width: 3,
            has_status_block: true,
            has_voltage: false,
            reserved_zeros: 0,
        }),
        0x32 => Some(SuffixLayout {
            mnc_width: 1,
            lac_width: 2,
            cell_id_width: 4,
            has_status_block: true,
            has_voltage: true,
            reserved_zeros: 6,
        }),
        0xA0 => Some(SuffixLayout {
            mnc_width: 2,
            lac_width: 4,
            cell_id_width: 8,
            has_status_block: true,
            has_voltage: true,
            reserved_zeros: 0,
        }),
        _ => None,
    }
}

fn push_be(out: &mut Vec<u8>, value: u64, width: usize) {
    let bytes = value.to_be_bytes();
    out.extend_from_slice(&bytes[8 - width..]);
}

/// Builds a GT06 location packet (protocol `0x12`/`0x22`/`0x32`/`0xA0`) for
/// `report`, returning `None` if `protocol` is not a known location variant.
pub fn build_location_packet(report: &LocationReport, protocol: u8, serial: u16) -> Option<Vec<u8>> {
    let layout = layout_for(protocol)?;

    let mut body = Vec::with_capacity(32);
    body.push(protocol);

    body.push((report.timestamp.year() % 100) as u8);
    body.push(report.timestamp.month() as u8);
    body.push(report.timestamp.day() as u8);
    body.push(report.timestamp.hour() as u8);
    body.push(report.timestamp.minute() as u8);
    body.push(report.timestamp.second() as u8);

    let satellites = report.satellites.min(15);
    body.push(0xC0 | satellites);

    let lat_raw = (report.latitude.abs() * 1_800_000.0) as u32;
    let lon_raw = (report.longitude.abs() * 1_800_000.0) as u32;
    body.extend_from_slice(&lat_raw.to_be_bytes());
    body.extend_from_slice(&lon_raw.to_be_bytes());

    body.push(report.speed_kmh);

    let direction = report.direction & 0x03FF;
    let gps_fixed = u16::from(report.gps_fixed);
    let is_lon_west = u16::from(report.longitude < 0.0);
    let is_lat_north = u16::from(report.is_north());
    let course_status = (gps_fixed << 12) | (is_lon_west << 11) | (is_lat_north << 10) | direction;
    body.extend_from_slice(&course_status.to_be_bytes());

    // LBS block: mcc is always a zero-valued u16 placeholder.
    push_be(&mut body, 0, 2);
    push_be(&mut body, 0, layout.mnc_width);
    push_be(&mut body, 0, layout.lac_width);
    push_be(&mut body, 0, layout.cell_id_width);

    if layout.has_status_block {
        body.push(u8::from(report.acc_status));
        body.push(0x00); // data upload
        body.push(0x00); // realtime flag
        body.extend_from_slice(&report.gps_odometer.to_be_bytes());
    }

    if layout.has_voltage {
        let voltage_raw = (report.voltage * 100.0).round() as u16;
        body.extend_from_slice(&voltage_raw.to_be_bytes());
    }

    body.extend(std::iter::repeat(0u8).take(layout.reserved_zeros));

    body.extend_from_slice(&serial.to_be_bytes());

    Some(finalize_short_frame(&body))
}
