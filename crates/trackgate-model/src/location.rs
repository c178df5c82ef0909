use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A canonical location report, produced by an input mapper (C3) and
/// consumed by the GT06 codec and output processor (C1/C6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Absolute UTC instant, already shifted from whatever clock the
    /// upstream source reports in.
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Satellite count; encoders clamp this to `min(15, satellites)`.
    pub satellites: u8,
    /// km/h, `0..=255`.
    pub speed_kmh: u8,
    /// Heading in degrees, `0..=1023` (10-bit field on the wire).
    pub direction: u16,
    pub gps_fixed: bool,
    pub acc_status: bool,
    /// Cumulative odometer in meters.
    pub gps_odometer: u32,
    /// External voltage in volts.
    pub voltage: f64,
}

impl LocationReport {
    /// `north` iff latitude is non-negative (so `-0.0` counts as north).
    pub fn is_north(&self) -> bool {
        self.latitude >= 0.0
    }

    /// `west` iff longitude is strictly negative (so `0.0` counts as east).
    pub fn is_west(&self) -> bool {
        self.longitude < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(lat: f64, lon: f64) -> LocationReport {
        LocationReport {
            timestamp: Utc::now(),
            latitude: lat,
            longitude: lon,
            satellites: 6,
            speed_kmh: 0,
            direction: 0,
            gps_fixed: false,
            acc_status: true,
            gps_odometer: 0,
            voltage: 1.11,
        }
    }

    #[test]
    fn negative_zero_latitude_is_north() {
        assert!(report(-0.0, 10.0).is_north());
    }

    #[test]
    fn zero_longitude_is_east() {
        assert!(!report(10.0, 0.0).is_west());
    }
}
