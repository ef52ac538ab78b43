use std::f64::consts::PI;

use super::error::ProjectionError;
use super::types::{GeographicPoint, ProjectedPoint, SpatialReference, WGS84_WKID};

/// Sphere radius used by spherical (Web) Mercator, in metres.
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

const WEB_MERCATOR_WKIDS: [u32; 4] = [3857, 900913, 102100, 102113];

/// Converts a projected point into WGS84 longitude/latitude.
///
/// Hosts with a real reprojection engine implement this themselves; the
/// controller only ever sees the trait.
pub trait Projector: Send + Sync {
    fn project(
        &self,
        point: ProjectedPoint,
        source: SpatialReference,
    ) -> Result<GeographicPoint, ProjectionError>;
}

/// Built-in projector for the spatial references map viewers emit most:
/// geographic WGS84 and spherical Web Mercator.
#[derive(Debug, Default, Clone, Copy)]
pub struct WkidProjector;

impl Projector for WkidProjector {
    fn project(
        &self,
        point: ProjectedPoint,
        source: SpatialReference,
    ) -> Result<GeographicPoint, ProjectionError> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(ProjectionError::NonFinite {
                x: point.x,
                y: point.y,
            });
        }

        match source.wkid {
            WGS84_WKID => {
                if !(-180.0..=180.0).contains(&point.x) || !(-90.0..=90.0).contains(&point.y) {
                    return Err(ProjectionError::OutOfRange {
                        x: point.x,
                        y: point.y,
                        wkid: source.wkid,
                    });
                }
                Ok(GeographicPoint::new(point.x, point.y))
            }
            wkid if WEB_MERCATOR_WKIDS.contains(&wkid) => unproject_mercator(point, wkid),
            wkid => Err(ProjectionError::UnsupportedSpatialReference(wkid)),
        }
    }
}

fn unproject_mercator(point: ProjectedPoint, wkid: u32) -> Result<GeographicPoint, ProjectionError> {
    let half_circumference = PI * MERCATOR_RADIUS_M;
    // Easting beyond the antimeridian is allowed up to one extra wrap.
    if point.x.abs() > 2.0 * half_circumference {
        return Err(ProjectionError::OutOfRange {
            x: point.x,
            y: point.y,
            wkid,
        });
    }

    let lon = (point.x / MERCATOR_RADIUS_M).to_degrees();
    let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
    let lat = (2.0 * (point.y / MERCATOR_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();

    Ok(GeographicPoint::new(lon, lat))
}
