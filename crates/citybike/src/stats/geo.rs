//! Great-circle distances between stations.

use crate::model::Station;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two coordinates in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Straight-line distance between two stations.
pub fn station_distance(a: &Station, b: &Station) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// The station closest to a point, with its distance. Ties go to the
/// earlier station.
pub fn nearest_station<'a>(
    stations: impl IntoIterator<Item = &'a Station>,
    latitude: f64,
    longitude: f64,
) -> Option<(&'a Station, f64)> {
    stations
        .into_iter()
        .map(|s| (s, haversine_distance(latitude, longitude, s.latitude, s.longitude)))
        .fold(None, |best, (station, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((station, d)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_distance(50.0, 10.0, 50.0, 10.0), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // One degree of latitude is about 111.19 km.
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01);

        // Paris to London, roughly 343.5 km.
        let d = haversine_distance(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((d - 343.5).abs() < 1.0);
    }

    #[test]
    fn test_nearest_station() {
        let stations = vec![
            Station::new("S1", "Far", 10.0, 10.0, 5),
            Station::new("S2", "Near", 0.1, 0.1, 5),
        ];
        let (station, d) = nearest_station(&stations, 0.0, 0.0).unwrap();
        assert_eq!(station.id, "S2");
        assert!(d > 0.0);
        assert!(nearest_station(&Vec::<Station>::new(), 0.0, 0.0).is_none());
    }
}
