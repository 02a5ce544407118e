//! Error types for signed URL generation and configuration.
//!
//! A signature mismatch or an expired URL is *not* an error: the validator
//! reports both as a plain `false`.  The variants here cover the cases where
//! the caller cannot get a URL at all.

use thiserror::Error;

/// Errors surfaced by the signing library.
#[derive(Debug, Error)]
pub enum SignedUrlError {
    /// `Generator::generate` was called before any configuration was installed.
    #[error("signed url generator is not configured: host, key_id and secret are required")]
    NotConfigured,

    /// The signing configuration failed validation (empty host, key or secret).
    #[error("invalid signing configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for [`crate::config::Config`].
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<garde::Report> for SignedUrlError {
    fn from(report: garde::Report) -> Self {
        SignedUrlError::InvalidConfig(report.to_string())
    }
}
