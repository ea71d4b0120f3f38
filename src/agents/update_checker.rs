use crate::agents::interaction::UpdateInteraction;
use crate::agents::manifest_editor::ManifestEditor;
use crate::error::SvcupError;
use crate::github::{CheckStatus, VersionComparator};
use crate::release::ReleaseSource;
use crate::services::{ServiceCatalog, ServiceDescriptor};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of checking one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub service: String,
    pub current: Option<String>,
    pub latest: Option<String>,
    pub update_available: bool,
    pub status: CheckStatus,
    /// Why the check failed, when it did
    pub errors: Vec<String>,
}

impl UpdateResult {
    pub fn is_error(&self) -> bool {
        self.status == CheckStatus::Error
    }
}

/// Results of one check cycle, in catalog order
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    results: Vec<UpdateResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckStats {
    pub updates_available: usize,
    pub up_to_date: usize,
    pub errors: usize,
}

impl CheckReport {
    pub fn get(&self, service: &str) -> Option<&UpdateResult> {
        self.results.iter().find(|r| r.service == service)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Signal for a launcher deciding whether to offer updates before startup
    pub fn updates_available(&self) -> bool {
        self.results.iter().any(|r| r.update_available)
    }

    pub fn stats(&self) -> CheckStats {
        let mut stats = CheckStats::default();
        for result in &self.results {
            if result.is_error() {
                stats.errors += 1;
            } else if result.update_available {
                stats.updates_available += 1;
            } else {
                stats.up_to_date += 1;
            }
        }
        stats
    }
}

/// What happened to each selected service during an apply pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub updated: Vec<(String, String)>,
    pub up_to_date: Vec<String>,
    pub skipped_errors: Vec<String>,
    pub declined: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub unknown: Vec<String>,
    pub cancelled: bool,
}

impl ApplyReport {
    pub fn updated_services(&self) -> Vec<&str> {
        self.updated.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Drives the check / update cycle over every configured service
pub struct UpdateChecker<'a> {
    catalog: &'a ServiceCatalog,
    editor: ManifestEditor,
    releases: Arc<dyn ReleaseSource>,
    show_progress: bool,
}

impl<'a> UpdateChecker<'a> {
    pub fn new(
        catalog: &'a ServiceCatalog,
        editor: ManifestEditor,
        releases: Arc<dyn ReleaseSource>,
    ) -> Self {
        Self {
            catalog,
            editor,
            releases,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn editor(&self) -> &ManifestEditor {
        &self.editor
    }

    /// Check every configured service; one failure never stops the rest.
    pub fn check_all(&self) -> CheckReport {
        let pb = ProgressBar::new(self.catalog.len() as u64);
        if !self.show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        // Services sharing an upstream project are looked up once per cycle
        let mut lookups: HashMap<String, Result<String, String>> = HashMap::new();
        let mut results = Vec::with_capacity(self.catalog.len());

        for service in self.catalog.iter() {
            pb.set_message(service.name.clone());
            results.push(self.check_service(service, &mut lookups));
            pb.inc(1);
        }
        pb.finish_and_clear();

        CheckReport { results }
    }

    fn check_service(
        &self,
        service: &ServiceDescriptor,
        lookups: &mut HashMap<String, Result<String, String>>,
    ) -> UpdateResult {
        let mut errors = Vec::new();

        let current = match self.editor.current_version(service) {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::warn!("{}: {}", service.name, e);
                errors.push(e.to_string());
                None
            }
        };

        let lookup = lookups
            .entry(service.project.clone())
            .or_insert_with(|| {
                self.releases
                    .latest_release(&service.project)
                    .map_err(|e| e.to_string())
            })
            .clone();

        let latest = match lookup {
            Ok(tag) => Some(service.normalize_release_tag(&tag).to_string()),
            Err(message) => {
                tracing::warn!("{}: {}", service.name, message);
                errors.push(message);
                None
            }
        };

        let (update_available, status) = match (&current, &latest) {
            (Some(current), Some(latest)) => VersionComparator::needs_update(current, latest),
            _ => (false, CheckStatus::Error),
        };

        UpdateResult {
            service: service.name.clone(),
            current,
            latest,
            update_available,
            status,
            errors,
        }
    }

    /// Pin the latest version for `selected` (or every service) where an update is available.
    pub fn apply_updates(
        &self,
        report: &CheckReport,
        selected: Option<&str>,
        interaction: &mut UpdateInteraction,
    ) -> ApplyReport {
        let names: Vec<String> = match selected {
            Some(name) => vec![name.to_string()],
            None => report.iter().map(|r| r.service.clone()).collect(),
        };

        let mut applied = ApplyReport::default();

        for name in names {
            let (Some(result), Some(service)) = (report.get(&name), self.catalog.get(&name))
            else {
                applied.unknown.push(name);
                continue;
            };

            let latest = match (&result.latest, result.update_available) {
                (Some(latest), true) => latest,
                _ if result.is_error() => {
                    applied.skipped_errors.push(name);
                    continue;
                }
                _ => {
                    applied.up_to_date.push(name);
                    continue;
                }
            };

            let current = result.current.as_deref().unwrap_or_default();
            match interaction.confirm(&name, current, latest) {
                Ok(true) => {}
                Ok(false) => {
                    applied.declined.push(name);
                    continue;
                }
                Err(SvcupError::UserCancelled) => {
                    applied.cancelled = true;
                    break;
                }
                Err(e) => {
                    applied.failed.push((name, e.to_string()));
                    continue;
                }
            }

            match self.editor.apply_version(service, latest) {
                Ok(true) => applied.updated.push((name, latest.clone())),
                Ok(false) => applied
                    .failed
                    .push((name, "no changes made (pattern might not match)".to_string())),
                Err(e) => applied.failed.push((name, e.to_string())),
            }
        }

        applied
    }
}
