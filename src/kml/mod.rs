mod error;
mod link;
mod look_at;
mod store;
mod templates;

pub use error::PersistenceError;
pub use link::LinkDescriptor;
pub use look_at::LookAtDescriptor;
pub use store::DescriptorStore;
