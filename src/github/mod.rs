pub mod release;
pub mod version;

pub use release::ReleaseIndexClient;
pub use version::{CheckStatus, LATEST_TAG, VersionComparator};
