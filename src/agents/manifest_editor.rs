use crate::error::{Result, SvcupError};
use crate::services::ServiceDescriptor;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads and rewrites pinned image versions in the deployment manifest
pub struct ManifestEditor {
    manifest_path: PathBuf,
}

impl ManifestEditor {
    pub fn new<P: AsRef<Path>>(manifest_path: P) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.manifest_path
    }

    /// Currently pinned version of `service`; `latest` when the image carries no tag.
    pub fn current_version(&self, service: &ServiceDescriptor) -> Result<String> {
        let content = self.load()?;

        service
            .extract_version(&content)
            .ok_or_else(|| SvcupError::PatternMismatch {
                service: service.name.clone(),
                detail: format!(
                    "version not found (no '{}' image line in {})",
                    service.image,
                    self.manifest_path.display()
                ),
            })
    }

    /// Pin `new_version` for `service`.
    ///
    /// Returns `Ok(false)` and leaves the file untouched when the substitution
    /// changes nothing.
    pub fn apply_version(&self, service: &ServiceDescriptor, new_version: &str) -> Result<bool> {
        if !service.is_valid_tag(new_version) {
            return Err(SvcupError::PatternMismatch {
                service: service.name.clone(),
                detail: format!("'{}' is not a valid image tag", new_version),
            });
        }

        let content = self.load()?;
        let updated = service.replace_version(&content, new_version);

        if updated == content {
            tracing::warn!(
                "No changes made for {} (pattern might not match)",
                service.name
            );
            return Ok(false);
        }

        self.write(&updated)?;
        tracing::debug!(
            "Pinned {} to {} in {}",
            service.name,
            new_version,
            self.manifest_path.display()
        );
        Ok(true)
    }

    fn load(&self) -> Result<String> {
        if !self.manifest_path.is_file() {
            return Err(SvcupError::ManifestMissing(
                self.manifest_path.display().to_string(),
            ));
        }
        Ok(fs::read_to_string(&self.manifest_path)?)
    }

    /// Replace the manifest through a sibling temp file and rename.
    fn write(&self, content: &str) -> Result<()> {
        let dir = match self.manifest_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;

        if let Ok(metadata) = fs::metadata(&self.manifest_path) {
            fs::set_permissions(tmp.path(), metadata.permissions())?;
        }

        tmp.persist(&self.manifest_path)
            .map_err(|e| SvcupError::Io(e.error))?;
        Ok(())
    }
}
