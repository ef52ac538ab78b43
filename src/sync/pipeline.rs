use std::sync::Arc;

use crate::geo::{self, round5, ProjectionError, Projector, RangeModel};
use crate::kml::LookAtDescriptor;

use super::types::ViewportSample;

/// Turns a viewport sample into a look-at descriptor. Each projection
/// completes before the next begins; nothing is produced unless all succeed.
#[derive(Clone)]
pub struct ViewPipeline {
    projector: Arc<dyn Projector>,
    range: RangeModel,
}

impl ViewPipeline {
    pub fn new(projector: Arc<dyn Projector>, range: RangeModel) -> Self {
        Self { projector, range }
    }

    pub fn compute(&self, sample: &ViewportSample) -> Result<LookAtDescriptor, ProjectionError> {
        let extent = &sample.extent;
        let lower_left = self
            .projector
            .project(extent.lower_left(), extent.spatial_reference)?;
        let upper_right = self
            .projector
            .project(extent.upper_right(), extent.spatial_reference)?;
        let range = self.range.range_for_extent(lower_left, upper_right);

        let target = self
            .projector
            .project(sample.camera.position(), sample.camera_spatial_reference())?;

        let orientation = geo::remap(sample.camera.heading, sample.camera.pitch);

        Ok(LookAtDescriptor {
            longitude: round5(target.longitude),
            latitude: round5(target.latitude),
            range,
            heading: orientation.heading,
            tilt: orientation.tilt,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geo::{Extent, SpatialReference, WkidProjector};
    use crate::sync::types::Camera;

    pub(crate) fn okinawa_sample(heading: f64, pitch: f64) -> ViewportSample {
        let extent = Extent {
            x_min: 127.78,
            y_min: 26.35,
            x_max: 127.79,
            y_max: 26.37,
            spatial_reference: SpatialReference::wgs84(),
        };
        let center = extent.center();
        ViewportSample {
            camera: Camera {
                x: center.x,
                y: center.y,
                spatial_reference: None,
                heading,
                pitch,
                roll: 0.0,
            },
            extent,
        }
    }

    fn pipeline() -> ViewPipeline {
        ViewPipeline::new(Arc::new(WkidProjector), RangeModel::default())
    }

    #[test]
    fn test_okinawa_scenario() {
        let view = pipeline().compute(&okinawa_sample(45.0, -20.0)).unwrap();

        assert_eq!(view.longitude, 127.785);
        assert_eq!(view.latitude, 26.36);
        assert_eq!(view.heading, 315.0);
        assert_eq!(view.tilt, 70.0);
        assert!(view.range.is_finite() && view.range > 0.0);
    }

    #[test]
    fn test_roll_does_not_change_view() {
        let level = okinawa_sample(45.0, -20.0);
        let mut rolled = level;
        rolled.camera.roll = 30.0;
        assert_eq!(pipeline().compute(&rolled).unwrap(), pipeline().compute(&level).unwrap());
    }

    #[test]
    fn test_identical_samples_render_identically() {
        let sample = okinawa_sample(-10.0, -90.0);
        let first = pipeline().compute(&sample).unwrap().to_kml().unwrap();
        let second = pipeline().compute(&sample).unwrap().to_kml().unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_round_trip_through_markup() {
        let view = pipeline().compute(&okinawa_sample(90.0, 0.0)).unwrap();
        let parsed = LookAtDescriptor::from_kml(&view.to_kml().unwrap()).unwrap();
        assert_eq!(parsed, view);
        assert_eq!(parsed.heading, 270.0);
        assert_eq!(parsed.tilt, 90.0);
    }

    #[test]
    fn test_web_mercator_extent() {
        let mut sample = okinawa_sample(0.0, -90.0);
        // Roughly 1 km square around the null island.
        sample.extent = Extent {
            x_min: -500.0,
            y_min: -500.0,
            x_max: 500.0,
            y_max: 500.0,
            spatial_reference: SpatialReference::web_mercator(),
        };
        sample.camera.x = 0.0;
        sample.camera.y = 0.0;

        let view = pipeline().compute(&sample).unwrap();
        assert_eq!(view.longitude, 0.0);
        assert_eq!(view.latitude, 0.0);
        // 1414 m diagonal * sqrt(3)/2
        assert!((view.range - 1224.0).abs() < 5.0, "got {}", view.range);
    }

    #[test]
    fn test_projection_failure_yields_no_descriptor() {
        let mut sample = okinawa_sample(0.0, 0.0);
        sample.extent.spatial_reference = SpatialReference::new(2154);

        let result = pipeline().compute(&sample);
        assert_eq!(
            result.unwrap_err(),
            ProjectionError::UnsupportedSpatialReference(2154)
        );
    }
}
