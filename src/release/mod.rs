use crate::error::Result;

pub mod factory;
pub use factory::ReleaseSourceFactory;

/// Source of "newest published release" tags for upstream projects
pub trait ReleaseSource: Send + Sync {
    /// Latest release tag for `project` with any leading `v` removed.
    fn latest_release(&self, project: &str) -> Result<String>;
}
