//! Territorial bounds check for coordinates accepted by the resolver.

/// Inclusive latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

/// Bounding box of Nigeria's territory.
pub const NIGERIA_BOUNDS: Bounds = Bounds {
    lat_min: 4.0,
    lat_max: 14.0,
    lng_min: 2.5,
    lng_max: 15.0,
};

impl Bounds {
    /// Returns `true` when both values are finite and inside the box (edges
    /// included). NaN and infinities are rejected rather than reported as errors.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat.is_finite()
            && lng.is_finite()
            && (self.lat_min..=self.lat_max).contains(&lat)
            && (self.lng_min..=self.lng_max).contains(&lng)
    }
}

/// Returns `true` if `(lat, lng)` falls within [`NIGERIA_BOUNDS`].
#[must_use]
pub fn is_within_nigeria(lat: f64, lng: f64) -> bool {
    NIGERIA_BOUNDS.contains(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_point_well_inside() {
        assert!(is_within_nigeria(9.0, 7.5));
    }

    #[test]
    fn accepts_abuja_and_rejects_latitude_below_minimum() {
        assert!(is_within_nigeria(9.05, 7.49));
        assert!(!is_within_nigeria(3.9, 7.49));
    }

    #[test]
    fn edges_are_inclusive() {
        assert!(is_within_nigeria(4.0, 2.5));
        assert!(is_within_nigeria(14.0, 15.0));
    }

    #[test]
    fn rejects_each_side_out_of_range() {
        assert!(!is_within_nigeria(14.01, 7.5));
        assert!(!is_within_nigeria(9.0, 2.49));
        assert!(!is_within_nigeria(9.0, 15.01));
    }

    #[test]
    fn rejects_non_finite_input() {
        assert!(!is_within_nigeria(f64::NAN, 7.5));
        assert!(!is_within_nigeria(9.0, f64::NAN));
        assert!(!is_within_nigeria(f64::INFINITY, 7.5));
        assert!(!is_within_nigeria(9.0, f64::NEG_INFINITY));
    }
}
