mod distance;
mod error;
mod orientation;
mod projector;
mod range;
mod types;

pub use distance::{great_circle_distance, DistanceUnit};
pub use error::ProjectionError;
pub use orientation::remap;
pub use projector::{Projector, WkidProjector};
pub use range::{RangeModel, DEFAULT_RANGE_FACTOR};
pub(crate) use range::round5;
pub use types::{Extent, GeographicPoint, ProjectedPoint, SpatialReference};
