use crate::error::{Result, SvcupError};
use crate::github::LATEST_TAG;
use crate::github::release::strip_v_prefix;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;

/// Declarative form of a service entry, as written in the built-in table or a config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    /// Upstream project on the release index, `owner/repo`
    pub project: String,
    /// Image reference without tag
    pub image: String,
    /// Whether the manifest may reference the image without a `:tag`
    #[serde(default)]
    pub tag_optional: bool,
    /// Extra prefix carried by upstream release tags (e.g. `n8n@`)
    #[serde(default)]
    pub tag_prefix: Option<String>,
}

impl ServiceSpec {
    pub fn new(
        name: impl Into<String>,
        project: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            image: image.into(),
            tag_optional: false,
            tag_prefix: None,
        }
    }

    pub fn optional_tag(mut self) -> Self {
        self.tag_optional = true;
        self
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = Some(prefix.into());
        self
    }
}

/// A validated service entry with its manifest pattern compiled.
///
/// The pattern matches one `image:` line and captures three groups: the head
/// (indentation, key, optional quote, image and, for required tags, the `:`),
/// the tag, and the tail (closing quote, trailing whitespace or comment).
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub name: String,
    pub project: String,
    pub image: String,
    pub tag_optional: bool,
    pub tag_prefix: Option<String>,
    pattern: Regex,
    tag_pattern: Regex,
}

impl ServiceDescriptor {
    pub fn from_spec(spec: ServiceSpec) -> Result<Self> {
        let invalid = |detail: &str| {
            SvcupError::Config(format!("Service '{}' is invalid: {}", spec.name, detail))
        };

        if spec.name.trim().is_empty() {
            return Err(SvcupError::Config(
                "Service name cannot be empty".to_string(),
            ));
        }
        if spec.image.trim().is_empty() || spec.image.contains(char::is_whitespace) {
            return Err(invalid("image must be a non-empty reference without spaces"));
        }
        let well_formed_project = matches!(
            spec.project.split_once('/'),
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/')
        );
        if !well_formed_project {
            return Err(invalid("project must be in 'owner/repo' form"));
        }

        let image = regex::escape(&spec.image);
        let source = if spec.tag_optional {
            format!(r#"(?m)^([ \t]*image:[ \t]*["']?{image})(?::([\w.-]*))?(["']?[ \t]*(?:#.*)?\r?)$"#)
        } else {
            format!(r#"(?m)^([ \t]*image:[ \t]*["']?{image}:)([\w.-]+)(["']?[ \t]*(?:#.*)?\r?)$"#)
        };
        let pattern = Regex::new(&source)
            .map_err(|e| invalid(&format!("manifest pattern does not compile: {e}")))?;
        let tag_pattern = Regex::new(r"^[\w.-]+$")
            .map_err(|e| invalid(&format!("tag pattern does not compile: {e}")))?;

        Ok(Self {
            name: spec.name,
            project: spec.project,
            image: spec.image,
            tag_optional: spec.tag_optional,
            tag_prefix: spec.tag_prefix.filter(|p| !p.is_empty()),
            pattern,
            tag_pattern,
        })
    }

    /// Pinned tag of the first matching line; an empty or absent tag reads as `latest`.
    pub fn extract_version(&self, content: &str) -> Option<String> {
        let caps = self.pattern.captures(content)?;
        let tag = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        if tag.is_empty() {
            Some(LATEST_TAG.to_string())
        } else {
            Some(tag.to_string())
        }
    }

    /// Rewrite every matching line to pin `new_version`.
    pub fn replace_version<'a>(&self, content: &'a str, new_version: &str) -> Cow<'a, str> {
        self.pattern.replace_all(content, |caps: &Captures| {
            let head = &caps[1];
            let tail = &caps[3];
            if !self.tag_optional {
                format!("{head}{new_version}{tail}")
            } else if new_version == LATEST_TAG {
                format!("{head}{tail}")
            } else {
                format!("{head}:{new_version}{tail}")
            }
        })
    }

    /// Turn an upstream release tag into the tag used for the image.
    pub fn normalize_release_tag<'a>(&self, tag: &'a str) -> &'a str {
        let tag = match &self.tag_prefix {
            Some(prefix) => tag.strip_prefix(prefix.as_str()).unwrap_or(tag),
            None => tag,
        };
        strip_v_prefix(tag)
    }

    /// Tags the manifest pattern can read back: word characters, `.` and `-`.
    pub fn is_valid_tag(&self, tag: &str) -> bool {
        self.tag_pattern.is_match(tag)
    }
}
