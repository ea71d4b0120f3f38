use crate::config::Settings;
use crate::error::Result;
use crate::github::ReleaseIndexClient;
use crate::release::ReleaseSource;
use std::sync::Arc;

pub struct ReleaseSourceFactory;

impl ReleaseSourceFactory {
    pub fn create(settings: &Settings) -> Result<Arc<dyn ReleaseSource>> {
        let client = ReleaseIndexClient::with_base_url(&settings.release_index, settings.timeout)?;
        Ok(Arc::new(client))
    }
}
