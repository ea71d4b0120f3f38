use crate::error::{Result, SvcupError};
use crate::github::release::{DEFAULT_RELEASE_INDEX, DEFAULT_TIMEOUT_SECS};
use crate::services::{ServiceCatalog, ServiceSpec};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MANIFEST: &str = "docker-compose.yml";
/// Picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "svcup.toml";

/// Values supplied on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub release_index: Option<String>,
}

/// Effective settings for one run.
///
/// Precedence: command line / environment, then the config file, then
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub manifest_path: PathBuf,
    pub release_index: String,
    pub timeout: Duration,
    pub catalog: ServiceCatalog,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    manifest: Option<PathBuf>,
    release_index: Option<ReleaseIndexSection>,
    #[serde(default, rename = "service")]
    services: Vec<ServiceSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReleaseIndexSection {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Settings {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => Self::read_config(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::read_config(default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Self::resolve(file, overrides)
    }

    fn read_config(path: &Path) -> Result<ConfigFile> {
        tracing::debug!("Reading config: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            SvcupError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn resolve(file: ConfigFile, overrides: &Overrides) -> Result<Self> {
        let index = file.release_index.unwrap_or_default();

        let timeout_secs = index.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(SvcupError::Config(
                "release_index.timeout_secs must be greater than zero".to_string(),
            ));
        }

        let catalog = if file.services.is_empty() {
            ServiceCatalog::builtin()?
        } else {
            ServiceCatalog::from_specs(file.services)?
        };

        Ok(Self {
            manifest_path: overrides
                .manifest
                .clone()
                .or(file.manifest)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST)),
            release_index: overrides
                .release_index
                .clone()
                .or(index.url)
                .unwrap_or_else(|| DEFAULT_RELEASE_INDEX.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            catalog,
        })
    }
}
