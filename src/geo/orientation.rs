//! Camera orientation remapping between the map viewer and the globe viewer.
//!
//! The map camera reports heading relative to the camera itself (0, 90, 180,
//! -90) and pitch with 0 meaning horizontal. The globe viewer expects a
//! bearing in [0, 360) and a tilt where 0 looks straight down.

pub const MAX_TILT_DEG: f64 = 180.0;

/// Heading and tilt in the globe viewer's convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub heading: f64,
    pub tilt: f64,
}

/// Bring any heading into [0, 360).
pub fn normalize_heading(heading: f64) -> f64 {
    let normalized = heading.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Flip a map heading into the globe viewer's bearing.
pub fn remap_heading(heading: f64) -> f64 {
    let heading = if heading.is_finite() {
        heading
    } else {
        log::warn!("Non-finite camera heading {}, using 0", heading);
        0.0
    };
    normalize_heading(360.0 - normalize_heading(heading))
}

/// Convert a map pitch (0 = horizontal, -90 = straight down) into a tilt.
pub fn remap_tilt(pitch: f64) -> f64 {
    let pitch = if pitch.is_finite() {
        pitch
    } else {
        log::warn!("Non-finite camera pitch {}, looking straight down", pitch);
        -90.0
    };
    (pitch + 90.0).clamp(0.0, MAX_TILT_DEG)
}

pub fn remap(heading: f64, pitch: f64) -> Orientation {
    Orientation {
        heading: remap_heading(heading),
        tilt: remap_tilt(pitch),
    }
}
