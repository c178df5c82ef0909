use serde::Deserialize;

/// Raw location record as returned by an upstream vendor API (MT02 today).
/// Timestamps are epoch seconds in the vendor's local clock; coordinates and
/// battery level are whatever the vendor's JSON payload carries.
#[derive(Clone, Debug, Deserialize)]
pub struct VendorRecord {
    pub timestamp: i64,
    pub lat: Option<f64>,
    #[serde(rename = "lng")]
    pub lon: Option<f64>,
    /// Battery level on the vendor's 1..3 volt-like scale; `-1` or absent
    /// means unknown.
    #[serde(default)]
    pub battery: Option<f64>,
}

impl VendorRecord {
    pub fn has_coordinates(&self) -> bool {
        !matches!(self.lat, None | Some(0.0)) && !matches!(self.lon, None | Some(0.0))
    }

    pub fn battery_known(&self) -> Option<f64> {
        self.battery.filter(|b| *b != -1.0)
    }
}
