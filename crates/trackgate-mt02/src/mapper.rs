use chrono::{DateTime, Duration, TimeZone, Utc};

use trackgate_model::{DeviceId, LocationReport, VendorRecord};
use trackgate_store::DeviceStateRepo;

const SOURCE: &str = "mt02";
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Integer-meter haversine distance between two lat/lon pairs in degrees.
/// Matches the original mapper's truncation (not rounding) to whole meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> u32 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    (EARTH_RADIUS_M * c) as u32
}

/// Transforms a raw MT02 record into a canonical `LocationReport`, persisting
/// the odometer/position/voltage fields it derives along the way. Returns
/// `None` (and logs) when the record carries no usable coordinates.
pub async fn map_location_data(
    store: &DeviceStateRepo,
    device_id: &DeviceId,
    record: &VendorRecord,
) -> Result<Option<LocationReport>, trackgate_store::StoreError> {
    if !record.has_coordinates() {
        tracing::error!(device_id = %device_id, "it was not possible to continue the mapping of the data, coordinates corrupted");
        return Ok(None);
    }
    let (lat, lon) = (record.lat.unwrap(), record.lon.unwrap());

    // The MT02 tag reports in UTC-3; most downstream platforms expect UTC.
    let naive = Utc.timestamp_opt(record.timestamp, 0).single().unwrap_or_else(Utc::now);
    let timestamp: DateTime<Utc> = naive + Duration::hours(3);

    let last_odometer = store.last_odometer(SOURCE, device_id).await?;
    let last_coordinates = store.last_coordinates(SOURCE, device_id).await?;

    let odometer = match last_coordinates {
        Some((last_lat, last_lon)) => last_odometer + haversine_meters(last_lat, last_lon, lat, lon),
        None => {
            tracing::warn!(device_id = %device_id, "there are no coordinates stored in the device state storage, continuing with 0 odometer increment");
            last_odometer
        }
    };
    store.save_position(SOURCE, device_id, lat, lon, odometer).await?;

    let voltage = match record.battery_known() {
        Some(battery) => {
            let voltage = battery * 100.0 / 3.0;
            store.set_voltage(SOURCE, device_id, voltage).await?;
            voltage
        }
        None => store.voltage(SOURCE, device_id).await?.unwrap_or(trackgate_model::DEFAULT_VOLTAGE),
    };

    Ok(Some(LocationReport {
        timestamp,
        latitude: lat,
        longitude: lon,
        satellites: 6,
        speed_kmh: 0,
        direction: 0,
        gps_fixed: false,
        acc_status: true,
        gps_odometer: odometer,
        voltage,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trackgate_store::InMemoryStore;

    fn repo() -> DeviceStateRepo {
        DeviceStateRepo::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn haversine_matches_the_documented_scenario() {
        let meters = haversine_meters(-23.5505, -46.6333, -23.5510, -46.6333);
        assert!((50..=60).contains(&meters), "expected ~55m, got {meters}");
    }

    #[tokio::test]
    async fn missing_coordinates_yields_no_report() {
        let store = repo();
        let id = DeviceId::normalize("123456789012345");
        let record = VendorRecord {
            timestamp: 1_700_000_000,
            lat: None,
            lon: Some(-46.6333),
            battery: None,
        };
        assert!(map_location_data(&store, &id, &record).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_report_has_zero_odometer_increment() {
        let store = repo();
        let id = DeviceId::normalize("123456789012345");
        let record = VendorRecord {
            timestamp: 1_700_000_000,
            lat: Some(-23.5505),
            lon: Some(-46.6333),
            battery: None,
        };
        let report = map_location_data(&store, &id, &record).await.unwrap().unwrap();
        assert_eq!(report.gps_odometer, 0);
        assert_eq!(report.voltage, trackgate_model::DEFAULT_VOLTAGE);
    }

    #[tokio::test]
    async fn successive_reports_accrue_the_haversine_distance() {
        let store = repo();
        let id = DeviceId::normalize("123456789012345");
        let first = VendorRecord {
            timestamp: 1_700_000_000,
            lat: Some(-23.5505),
            lon: Some(-46.6333),
            battery: None,
        };
        map_location_data(&store, &id, &first).await.unwrap();

        let second = VendorRecord {
            timestamp: 1_700_000_060,
            lat: Some(-23.5510),
            lon: Some(-46.6333),
            battery: Some(3.0),
        };
        let report = map_location_data(&store, &id, &second).await.unwrap().unwrap();
        assert!((50..=60).contains(&report.gps_odometer));
        assert_eq!(report.voltage, 100.0);
    }

    #[tokio::test]
    async fn unknown_battery_falls_back_to_default_voltage() {
        let store = repo();
        let id = DeviceId::normalize("123456789012345");
        let record = VendorRecord {
            timestamp: 1_700_000_000,
            lat: Some(-23.5505),
            lon: Some(-46.6333),
            battery: Some(-1.0),
        };
        let report = map_location_data(&store, &id, &record).await.unwrap().unwrap();
        assert_eq!(report.voltage, trackgate_model::DEFAULT_VOLTAGE);
    }
}
