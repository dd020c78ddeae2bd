use serde::{Deserialize, Serialize};

/// Quantization step for coordinate keys: 1e-6 degrees.
pub const COORD_QUANTUM: f64 = 1.0e-6;

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Exact grouping key. Two positions share a key iff they are the same
    /// point at 1e-6 degree resolution.
    pub fn key(&self) -> CoordKey {
        CoordKey {
            lat_q: quantize(self.lat),
            lng_q: quantize(self.lng),
        }
    }
}

/// Hashable, totally ordered form of a [`LatLng`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoordKey {
    pub lat_q: i64,
    pub lng_q: i64,
}

impl CoordKey {
    pub fn to_lat_lng(self) -> LatLng {
        LatLng::new(
            self.lat_q as f64 * COORD_QUANTUM,
            self.lng_q as f64 * COORD_QUANTUM,
        )
    }
}

impl std::fmt::Display for CoordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.to_lat_lng();
        write!(f, "{:.6},{:.6}", p.lat, p.lng)
    }
}

fn quantize(deg: f64) -> i64 {
    // -0.0 and 0.0 quantize to the same bucket.
    (deg / COORD_QUANTUM).round() as i64
}

#[cfg(test)]
mod tests {
    use super::LatLng;

    #[test]
    fn identical_points_share_key() {
        let a = LatLng::new(42.636_05, 24.358_2);
        let b = LatLng::new(42.636_05, 24.358_2);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn nearby_points_do_not_share_key() {
        let a = LatLng::new(41.8925, 12.4853);
        let b = LatLng::new(41.8925, 12.4854);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn negative_zero_matches_zero() {
        assert_eq!(LatLng::new(-0.0, 0.0).key(), LatLng::new(0.0, -0.0).key());
    }

    #[test]
    fn key_display_is_fixed_precision() {
        assert_eq!(LatLng::new(20.0, 0.0).key().to_string(), "20.000000,0.000000");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(LatLng::new(20.0, 0.0).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }
}
