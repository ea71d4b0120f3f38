use crate::error::{Result, SvcupError};
use std::cmp::Ordering;
use std::fmt;

/// Pinned-version placeholder for an image reference without an explicit tag
pub const LATEST_TAG: &str = "latest";

/// Version representation supporting the tag formats seen on image registries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub original: String,
    pub parsed: VersionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionType {
    Semantic(semver::Version),
    Numeric(Vec<u64>),
}

impl Version {
    /// Parse a tag as a semantic version.
    ///
    /// Strict semver is tried first. Short numeric cores such as `5.3` or
    /// `v2` are padded to `major.minor.patch` and may still carry a
    /// pre-release or build suffix. Purely numeric tags with four or more
    /// components are kept as a plain numeric sequence.
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        let body = match trimmed.strip_prefix(['v', 'V']) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => trimmed,
        };

        let parsed = if let Ok(v) = semver::Version::parse(body) {
            VersionType::Semantic(v)
        } else {
            Self::parse_relaxed(body)
                .ok_or_else(|| SvcupError::ParseFailure(version.to_string()))?
        };

        Ok(Version {
            original: version.to_string(),
            parsed,
        })
    }

    fn parse_relaxed(body: &str) -> Option<VersionType> {
        let split_at = body.find(['-', '+']).unwrap_or(body.len());
        let (core, suffix) = body.split_at(split_at);

        let mut numbers = Vec::new();
        for part in core.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            numbers.push(part.parse::<u64>().ok()?);
        }

        match numbers.len() {
            1..=3 => {
                numbers.resize(3, 0);
                let normalized = format!("{}.{}.{}{}", numbers[0], numbers[1], numbers[2], suffix);
                semver::Version::parse(&normalized)
                    .ok()
                    .map(VersionType::Semantic)
            }
            _ if suffix.is_empty() => Some(VersionType::Numeric(numbers)),
            _ => None,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        match &self.parsed {
            VersionType::Semantic(v) => !v.pre.is_empty(),
            VersionType::Numeric(_) => false,
        }
    }

    /// Precedence between two versions, `None` when they cannot be ordered.
    ///
    /// Semantic versions that differ only in build metadata are ordered by it,
    /// so distinct tags never compare equal.
    pub fn precedence(&self, other: &Self) -> Option<Ordering> {
        match (&self.parsed, &other.parsed) {
            (VersionType::Semantic(a), VersionType::Semantic(b)) => Some(a.cmp(b)),
            (VersionType::Numeric(a), VersionType::Numeric(b)) => Some(compare_numeric(a, b)),
            (VersionType::Semantic(s), VersionType::Numeric(n)) if s.pre.is_empty() => {
                Some(compare_numeric(&[s.major, s.minor, s.patch], n))
            }
            (VersionType::Numeric(n), VersionType::Semantic(s)) if s.pre.is_empty() => {
                Some(compare_numeric(n, &[s.major, s.minor, s.patch]))
            }
            _ => None,
        }
    }
}

fn compare_numeric(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Outcome label attached to every checked service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    UsingLatestTag,
    UpToDate,
    UpdateAvailable,
    ComparisonFailed,
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckStatus::UsingLatestTag => "using latest tag",
            CheckStatus::UpToDate => "up to date",
            CheckStatus::UpdateAvailable => "update available",
            CheckStatus::ComparisonFailed => "version comparison failed",
            CheckStatus::Error => "error checking versions",
        };
        f.write_str(label)
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Decide whether `latest` should replace `current`
    pub fn needs_update(current: &str, latest: &str) -> (bool, CheckStatus) {
        if current == LATEST_TAG {
            return (true, CheckStatus::UsingLatestTag);
        }

        if current == latest {
            return (false, CheckStatus::UpToDate);
        }

        match Self::is_newer(latest, current) {
            Ok(true) => (true, CheckStatus::UpdateAvailable),
            Ok(false) => (false, CheckStatus::UpToDate),
            Err(e) => {
                tracing::debug!("falling back to string comparison: {}", e);
                (current != latest, CheckStatus::ComparisonFailed)
            }
        }
    }

    /// Check if version `a` is newer than version `b`
    pub fn is_newer(a: &str, b: &str) -> Result<bool> {
        let va = Version::parse(a)?;
        let vb = Version::parse(b)?;
        va.precedence(&vb)
            .map(|ordering| ordering == Ordering::Greater)
            .ok_or_else(|| SvcupError::ParseFailure(format!("{a} vs {b}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let v1 = Version::parse("1.0.0").unwrap();
        let v2 = Version::parse("1.0.1").unwrap();
        assert_eq!(v2.precedence(&v1), Some(Ordering::Greater));
    }

    #[test]
    fn short_versions_are_padded() {
        let short = Version::parse("5.3").unwrap();
        let full = Version::parse("5.3.0").unwrap();
        assert_eq!(short.precedence(&full), Some(Ordering::Equal));

        let major_only = Version::parse("v2").unwrap();
        assert!(matches!(major_only.parsed, VersionType::Semantic(ref v) if v.major == 2));
    }

    #[test]
    fn prerelease_suffix_survives_padding() {
        let v = Version::parse("0.5-rc1").unwrap();
        assert!(v.is_prerelease());
        assert_eq!(
            Version::parse("0.5.0").unwrap().precedence(&v),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn four_component_tags_are_numeric() {
        let a = Version::parse("1.2.3.4").unwrap();
        let b = Version::parse("1.2.3").unwrap();
        assert!(matches!(a.parsed, VersionType::Numeric(_)));
        assert_eq!(a.precedence(&b), Some(Ordering::Greater));
    }

    #[test]
    fn non_versions_fail_to_parse() {
        assert!(matches!(
            Version::parse("main"),
            Err(SvcupError::ParseFailure(_))
        ));
        assert!(Version::parse("n8n@1.2.3").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn latest_tag_always_updates() {
        for latest in ["1.0.0", "latest", "garbage", ""] {
            assert_eq!(
                VersionComparator::needs_update(LATEST_TAG, latest),
                (true, CheckStatus::UsingLatestTag)
            );
        }
    }

    #[test]
    fn identical_versions_are_up_to_date() {
        for v in ["1.0.0", "0.3.21", "2.0.0-beta.1"] {
            assert_eq!(
                VersionComparator::needs_update(v, v),
                (false, CheckStatus::UpToDate)
            );
        }
    }

    #[test]
    fn newer_release_is_an_update() {
        assert_eq!(
            VersionComparator::needs_update("5.3.0", "5.4.1"),
            (true, CheckStatus::UpdateAvailable)
        );
        assert_eq!(
            VersionComparator::needs_update("5.4.1", "5.3.0"),
            (false, CheckStatus::UpToDate)
        );
    }

    #[test]
    fn comparison_is_antisymmetric_for_distinct_versions() {
        let versions = [
            "0.9.0",
            "1.0.0-alpha",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.0+build.5",
            "1.0.10",
            "1.2",
            "10.0.0",
        ];
        for a in versions {
            for b in versions {
                if a == b {
                    continue;
                }
                let (forward, _) = VersionComparator::needs_update(a, b);
                let (backward, _) = VersionComparator::needs_update(b, a);
                assert_ne!(forward, backward, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn build_metadata_orders_after_bare_release() {
        assert_eq!(
            VersionComparator::needs_update("1.0.0", "1.0.0+build.5"),
            (true, CheckStatus::UpdateAvailable)
        );
        assert_eq!(
            VersionComparator::needs_update("1.0.0+build.5", "1.0.0"),
            (false, CheckStatus::UpToDate)
        );
    }

    #[test]
    fn prerelease_orders_below_release() {
        assert_eq!(
            VersionComparator::needs_update("1.0.0-rc.1", "1.0.0"),
            (true, CheckStatus::UpdateAvailable)
        );
        assert_eq!(
            VersionComparator::needs_update("1.0.0", "1.0.0-rc.1"),
            (false, CheckStatus::UpToDate)
        );
    }

    #[test]
    fn unparseable_versions_fall_back_to_inequality() {
        assert_eq!(
            VersionComparator::needs_update("main", "1.0.0"),
            (true, CheckStatus::ComparisonFailed)
        );
        assert_eq!(
            VersionComparator::needs_update("1.0.0-rc.1", "1.0.0.1"),
            (true, CheckStatus::ComparisonFailed)
        );
    }

    #[test]
    fn status_labels() {
        assert_eq!(CheckStatus::UsingLatestTag.to_string(), "using latest tag");
        assert_eq!(CheckStatus::Error.to_string(), "error checking versions");
    }
}
