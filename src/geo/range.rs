use serde::{Deserialize, Serialize};

use super::distance::great_circle_km;
use super::types::GeographicPoint;

/// sqrt(3) / 2: frames the diagonal under a ~60 degree field of view.
pub const DEFAULT_RANGE_FACTOR: f64 = 0.866_025_403_784_438_6;

/// Heuristic mapping from the visible diagonal to a viewer range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeModel {
    pub factor: f64,
}

impl Default for RangeModel {
    fn default() -> Self {
        Self {
            factor: DEFAULT_RANGE_FACTOR,
        }
    }
}

impl RangeModel {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// Range in metres for an extent given its geographic lower-left and
    /// upper-right corners.
    pub fn range_for_extent(&self, lower_left: GeographicPoint, upper_right: GeographicPoint) -> f64 {
        let diagonal_m = round2(great_circle_km(lower_left, upper_right) * 1000.0);
        self.range_for_diagonal(diagonal_m)
    }

    pub fn range_for_diagonal(&self, diagonal_m: f64) -> f64 {
        round2(diagonal_m * self.factor)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factor_is_sqrt3_over_2() {
        assert!((DEFAULT_RANGE_FACTOR - 3f64.sqrt() / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_range_for_1000m_diagonal() {
        assert_eq!(RangeModel::default().range_for_diagonal(1000.0), 866.03);
    }

    #[test]
    fn test_custom_factor() {
        assert_eq!(RangeModel::new(1.0).range_for_diagonal(1234.5), 1234.5);
    }

    #[test]
    fn test_degenerate_extent_has_negligible_range() {
        let p = GeographicPoint::new(127.78, 26.35);
        let range = RangeModel::default().range_for_extent(p, p);
        assert!((0.0..1.0).contains(&range), "got {}", range);
    }

    #[test]
    fn test_small_okinawa_extent() {
        let range = RangeModel::default().range_for_extent(
            GeographicPoint::new(127.78, 26.35),
            GeographicPoint::new(127.79, 26.37),
        );
        // ~2.45 km diagonal
        assert!(range.is_finite());
        assert!(range > 2000.0 && range < 2300.0, "got {}", range);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round2(866.025403), 866.03);
        assert_eq!(round5(127.7838094), 127.78381);
    }
}
