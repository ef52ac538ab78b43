use thiserror::Error;

use crate::geo::ProjectionError;
use crate::kml::PersistenceError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync already active")]
    AlreadyActive,
    #[error("sync not active")]
    Inactive,
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}
