use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvcupError {
    #[error("Release lookup failed for {project}: {reason}")]
    LookupFailure { project: String, reason: String },

    #[error("Manifest file not found: {0}")]
    ManifestMissing(String),

    #[error("Pattern did not match for {service}: {detail}")]
    PatternMismatch { service: String, detail: String },

    #[error("Version '{0}' is not a comparable version")]
    ParseFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SvcupError>;
