// THEORY:
// The `geodesy` module is the single distance authority for the spatial layer.
// It treats the Earth as a sphere of mean radius 6371 km and measures the
// great-circle distance between two coordinates with the haversine formula,
// which is numerically stable for the short hops the clustering engine cares
// about.
//
// Key architectural principles:
// 1.  **Validate Once**: `GeoPoint::new` is the only place latitude/longitude
//     ranges are checked. A `GeoPoint` in hand is always safe to feed to the
//     distance math, so `distance_to` itself is infallible.
// 2.  **Symmetry**: `a.distance_to(&b)` and `b.distance_to(&a)` are equal, and
//     the distance from a point to itself is zero. The clustering engine relies
//     on both.

use thiserror::Error;

/// Mean Earth radius in meters, per the haversine convention.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeodesyError {
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Builds a point, rejecting out-of-range coordinates. NaN is rejected by
    /// the same range checks.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeodesyError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeodesyError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeodesyError::InvalidLongitude(longitude));
        }
        Ok(GeoPoint { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point, in meters (haversine).
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Great-circle distance in meters between two raw coordinate pairs.
///
/// Validates both pairs on every call; prefer constructing `GeoPoint`s when
/// coordinates are reused, as the clustering engine does.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, GeodesyError> {
    Ok(GeoPoint::new(lat1, lon1)?.distance_to(&GeoPoint::new(lat2, lon2)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let point = GeoPoint::new(48.8566, 2.3522).unwrap();
        assert_eq!(point.distance_to(&point), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(48.8566, 2.3522).unwrap();
        let b = GeoPoint::new(48.8600, 2.3600).unwrap();
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn millidegree_of_latitude_is_about_111_meters() {
        // One degree of latitude spans pi * R / 180 meters on a sphere, so
        // 0.001 degrees is ~111.195 m.
        let meters = distance(48.8566, 2.3522, 48.8576, 2.3522).unwrap();
        assert!((meters - 111.1949).abs() < 0.01);
    }

    #[test]
    fn equatorial_millidegree_of_longitude_matches_latitude_spacing() {
        let meters = distance(0.0, 0.0, 0.0, 0.001).unwrap();
        assert!((meters - 111.1949).abs() < 0.01);
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(GeodesyError::InvalidLatitude(90.5))
        );
        assert_eq!(
            GeoPoint::new(-91.0, 0.0),
            Err(GeodesyError::InvalidLatitude(-91.0))
        );
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert_eq!(
            GeoPoint::new(0.0, 180.1),
            Err(GeodesyError::InvalidLongitude(180.1))
        );
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn poles_and_date_line_are_valid() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }
}
