use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const WGS84_WKID: u32 = 4326;

/// Longitude/latitude in decimal degrees, WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeographicPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeographicPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A spatial reference identified by its well-known id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub const fn new(wkid: u32) -> Self {
        Self { wkid }
    }

    pub const fn wgs84() -> Self {
        Self::new(WGS84_WKID)
    }

    pub const fn web_mercator() -> Self {
        Self::new(3857)
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// A point in the host map's projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible-extent rectangle in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Extent {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl Extent {
    pub fn lower_left(&self) -> ProjectedPoint {
        ProjectedPoint::new(self.x_min, self.y_min)
    }

    pub fn upper_right(&self) -> ProjectedPoint {
        ProjectedPoint::new(self.x_max, self.y_max)
    }

    pub fn center(&self) -> ProjectedPoint {
        ProjectedPoint::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_corners_and_center() {
        let extent = Extent {
            x_min: 127.78,
            y_min: 26.35,
            x_max: 127.79,
            y_max: 26.37,
            spatial_reference: SpatialReference::wgs84(),
        };

        assert_eq!(extent.lower_left(), ProjectedPoint::new(127.78, 26.35));
        assert_eq!(extent.upper_right(), ProjectedPoint::new(127.79, 26.37));

        let center = extent.center();
        assert!((center.x - 127.785).abs() < 1e-9);
        assert!((center.y - 26.36).abs() < 1e-9);
    }

    #[test]
    fn test_extent_spatial_reference_defaults_to_wgs84() {
        let extent: Extent =
            serde_json::from_str(r#"{"x_min":0,"y_min":0,"x_max":1,"y_max":1}"#).unwrap();
        assert_eq!(extent.spatial_reference.wkid, WGS84_WKID);
    }
}
