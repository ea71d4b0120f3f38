pub mod catalog;
pub mod descriptor;

pub use catalog::ServiceCatalog;
pub use descriptor::{ServiceDescriptor, ServiceSpec};
