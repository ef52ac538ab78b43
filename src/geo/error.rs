use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("unsupported spatial reference: wkid {0}")]
    UnsupportedSpatialReference(u32),
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
    #[error("coordinate ({x}, {y}) outside the domain of wkid {wkid}")]
    OutOfRange { x: f64, y: f64, wkid: u32 },
}
