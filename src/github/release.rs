use crate::error::{Result, SvcupError};
use crate::release::ReleaseSource;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_RELEASE_INDEX: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the release index (GitHub REST API layout)
pub struct ReleaseIndexClient {
    client: Client,
    base_url: String,
}

impl ReleaseIndexClient {
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::validate_base_url(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("svcup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SvcupError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the tag of the newest published release for `project` (`owner/repo`).
    ///
    /// A leading `v` is removed from the tag.
    pub fn latest_release(&self, project: &str) -> Result<String> {
        let release_url = format!("{}/repos/{}/releases/latest", self.base_url, project);
        tracing::debug!("Fetching: {}", release_url);

        let failure = |reason: String| SvcupError::LookupFailure {
            project: project.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&release_url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .map_err(|e| failure(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            tracing::debug!("HTTP {}: {}", response.status(), release_url);
            return Err(failure(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .map_err(|e| failure(format!("reading response failed: {e}")))?;
        let release: LatestRelease = serde_json::from_str(&body)
            .map_err(|e| failure(format!("malformed response: {e}")))?;

        let tag = release
            .tag_name
            .filter(|tag| !tag.trim().is_empty())
            .ok_or_else(|| failure("response has no tag_name".to_string()))?;

        Ok(strip_v_prefix(tag.trim()).to_string())
    }

    fn validate_base_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|_| SvcupError::Config(format!("Invalid release index URL: {url}")))?;

        match parsed.scheme() {
            "https" | "http" => Ok(()),
            scheme => Err(SvcupError::Config(format!(
                "Unsupported release index scheme: {scheme}"
            ))),
        }
    }
}

impl ReleaseSource for ReleaseIndexClient {
    fn latest_release(&self, project: &str) -> Result<String> {
        ReleaseIndexClient::latest_release(self, project)
    }
}

pub fn strip_v_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Server, ServerGuard};
    use std::io::Write;

    fn client_for(server: &ServerGuard) -> ReleaseIndexClient {
        ReleaseIndexClient::with_base_url(&server.url(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn strips_leading_v() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/neo4j/neo4j/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "v5.4.1", "name": "5.4.1"}"#)
            .create();

        let tag = client_for(&server).latest_release("neo4j/neo4j").unwrap();
        assert_eq!(tag, "5.4.1");
    }

    #[test]
    fn keeps_tag_without_prefix() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/qdrant/qdrant/releases/latest")
            .with_status(200)
            .with_body(r#"{"tag_name": "1.12.0"}"#)
            .create();

        let tag = client_for(&server).latest_release("qdrant/qdrant").unwrap();
        assert_eq!(tag, "1.12.0");
    }

    #[test]
    fn non_success_status_is_a_lookup_failure() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/missing/project/releases/latest")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create();

        let err = client_for(&server)
            .latest_release("missing/project")
            .unwrap_err();
        assert!(matches!(err, SvcupError::LookupFailure { ref project, .. } if project == "missing/project"));
    }

    #[test]
    fn missing_tag_is_a_lookup_failure() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/a/b/releases/latest")
            .with_status(200)
            .with_body(r#"{"name": "no tag here"}"#)
            .create();

        let err = client_for(&server).latest_release("a/b").unwrap_err();
        assert!(matches!(err, SvcupError::LookupFailure { .. }));
    }

    #[test]
    fn malformed_body_is_a_lookup_failure() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/a/b/releases/latest")
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create();

        let err = client_for(&server).latest_release("a/b").unwrap_err();
        assert!(matches!(err, SvcupError::LookupFailure { ref reason, .. } if reason.starts_with("malformed")));
    }

    #[test]
    fn slow_response_times_out() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/repos/langfuse/langfuse/releases/latest")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(br#"{"tag_name": "v3.2.0"}"#)
            })
            .create();

        let client = ReleaseIndexClient::with_base_url(&server.url(), Duration::from_secs(1)).unwrap();
        let err = client.latest_release("langfuse/langfuse").unwrap_err();
        assert!(matches!(err, SvcupError::LookupFailure { ref project, .. } if project == "langfuse/langfuse"));
    }

    #[test]
    fn rejects_invalid_scheme() {
        let err = ReleaseIndexClient::with_base_url("ftp://example.com", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, SvcupError::Config(_)));
    }

    #[test]
    #[ignore] // Requires network access
    fn test_fetch_real_release() {
        let client = ReleaseIndexClient::with_base_url(
            DEFAULT_RELEASE_INDEX,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
        .unwrap();
        let tag = client.latest_release("qdrant/qdrant");
        assert!(tag.is_ok());
    }
}
