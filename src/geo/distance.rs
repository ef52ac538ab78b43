use serde::{Deserialize, Serialize};

use super::types::GeographicPoint;

const MINUTES_PER_DEGREE: f64 = 60.0;
const STATUTE_MILES_PER_NAUTICAL_MINUTE: f64 = 1.1515;
const KM_PER_STATUTE_MILE: f64 = 1.609344;
const NAUTICAL_MILES_PER_STATUTE_MILE: f64 = 0.8684;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    #[strum(to_string = "km")]
    Kilometers,
    #[strum(to_string = "mi")]
    StatuteMiles,
    #[strum(to_string = "nmi")]
    NauticalMiles,
}

/// Surface distance between two points by the spherical law of cosines.
pub fn great_circle_distance(from: GeographicPoint, to: GeographicPoint, unit: DistanceUnit) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let theta = (from.longitude - to.longitude).to_radians();

    let cos_d = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * theta.cos();
    // Rounding can push identical or antipodal points just past +/-1.
    let d = cos_d.clamp(-1.0, 1.0).acos().to_degrees();

    let miles = d * MINUTES_PER_DEGREE * STATUTE_MILES_PER_NAUTICAL_MINUTE;
    match unit {
        DistanceUnit::Kilometers => miles * KM_PER_STATUTE_MILE,
        DistanceUnit::StatuteMiles => miles,
        DistanceUnit::NauticalMiles => miles * NAUTICAL_MILES_PER_STATUTE_MILE,
    }
}

pub fn great_circle_km(from: GeographicPoint, to: GeographicPoint) -> f64 {
    great_circle_distance(from, to, DistanceUnit::Kilometers)
}
