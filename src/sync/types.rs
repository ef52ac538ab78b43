use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::geo::{Extent, ProjectedPoint, SpatialReference};
use crate::kml::LookAtDescriptor;

/// Camera pose as reported by the map viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    /// Defaults to the extent's spatial reference.
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    /// Degrees, relative to the camera; may be negative.
    pub heading: f64,
    /// Degrees, 0 = horizontal, -90 = straight down.
    pub pitch: f64,
    /// Accepted for completeness; tilt comes from pitch and roll is ignored.
    #[serde(default)]
    pub roll: f64,
}

impl Camera {
    pub fn position(&self) -> ProjectedPoint {
        ProjectedPoint::new(self.x, self.y)
    }
}

/// One viewport-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ViewportSample {
    pub camera: Camera,
    pub extent: Extent,
}

impl ViewportSample {
    pub fn camera_spatial_reference(&self) -> SpatialReference {
        self.camera
            .spatial_reference
            .unwrap_or(self.extent.spatial_reference)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub enum SyncState {
    Inactive,
    Active { since: DateTime<Utc> },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyncStatus {
    pub state: SyncState,
    #[schema(value_type = String)]
    pub view_path: PathBuf,
    #[schema(value_type = String)]
    pub link_path: PathBuf,
    pub cycles_written: u64,
    pub cycles_failed: u64,
    pub cycles_superseded: u64,
    pub last_view: Option<LookAtDescriptor>,
    pub last_error: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_from_json() {
        let json = r#"{
            "camera": {"x": -13627361.0, "y": 4547679.0, "heading": -10, "pitch": -45},
            "extent": {
                "x_min": -13630000.0, "y_min": 4545000.0,
                "x_max": -13625000.0, "y_max": 4550000.0,
                "spatial_reference": {"wkid": 3857}
            }
        }"#;
        let sample: ViewportSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.camera.roll, 0.0);
        assert_eq!(sample.camera_spatial_reference(), SpatialReference::web_mercator());
    }

    #[test]
    fn test_camera_spatial_reference_override() {
        let json = r#"{
            "camera": {"x": 1, "y": 2, "spatial_reference": {"wkid": 4326}, "heading": 0, "pitch": 0},
            "extent": {"x_min": 0, "y_min": 0, "x_max": 1, "y_max": 1, "spatial_reference": {"wkid": 3857}}
        }"#;
        let sample: ViewportSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.camera_spatial_reference(), SpatialReference::wgs84());
    }
}
