//! A resolved WGS-84 position and the great-circle distance between two.
//!
//! reference: spec §5 ("Position tracking")

use modes::cpr::haversine_m;

/// A decoded latitude/longitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    /// Seconds since some caller-defined epoch; used for jitter/velocity
    /// reasonableness checks, not wall-clock display.
    pub time: f64,
}

impl Position {
    #[must_use]
    pub const fn new(lat: f64, lon: f64, time: f64) -> Self {
        Self { lat, lon, time }
    }

    /// Great-circle distance to `other`, in meters.
    #[must_use]
    pub fn distance_m(&self, other: &Self) -> f64 {
        haversine_m(self.lat, self.lon, other.lat, other.lon)
    }

    /// True when `self`'s coordinates are within the valid WGS-84 range.
    #[must_use]
    pub fn is_sane(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_between_identical_points_is_zero() {
        let a = Position::new(52.0, 4.0, 0.0);
        assert_eq!(a.distance_m(&a), 0.0);
    }

    #[test]
    fn out_of_range_coordinates_are_insane() {
        let p = Position::new(91.0, 4.0, 0.0);
        assert!(!p.is_sane());
    }
}
