mod controller;
mod error;
mod pipeline;
mod types;

pub use controller::SyncController;
pub use error::SyncError;
pub use pipeline::ViewPipeline;
pub use types::{Camera, SyncState, SyncStatus, ViewportSample};
