//! Configuration loading and types for signed URL generation.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct.  The `signing` section supplies the default
//! credentials used by [`crate::Generator`]; the `logging` section drives
//! the binary's tracing subscriber.

use garde::Validate;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::errors::SignedUrlError;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Default signing credentials.
    #[serde(default)]
    pub signing: SigningConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credentials and base URL used to produce or verify signatures.
///
/// Field names match `signed-url.example.yaml`: `signing.host`,
/// `signing.key_id` and `signing.secret`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct SigningConfig {
    /// Base URL prepended verbatim to every path (e.g. `https://cdn.example.com`).
    #[garde(length(min = 1))]
    #[serde(default)]
    pub host: String,

    /// Public key identifier (also accepts `access_key_id`).
    #[garde(length(min = 1))]
    #[serde(alias = "access_key_id", default)]
    pub key_id: String,

    /// Shared HMAC secret (also accepts `secret_key`).
    #[garde(length(min = 1))]
    #[serde(alias = "secret_key", default)]
    pub secret: String,
}

impl SigningConfig {
    /// Build a configuration from its three parts.
    pub fn new(
        host: impl Into<String>,
        key_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            key_id: key_id.into(),
            secret: secret.into(),
        }
    }

    /// Reject configurations with an empty host, key id or secret.
    pub fn check(&self) -> Result<(), SignedUrlError> {
        self.validate()?;
        Ok(())
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("host", &self.host)
            .field("key_id", &self.key_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// How the `signed-url` binary writes its diagnostics to stderr.
///
/// The library itself only emits `tracing` events; this section is read by
/// the binary when it installs a subscriber.  `RUST_LOG` takes precedence
/// over `level`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `signed_url=debug`.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single lines.
    Text,
    /// One JSON object per event.
    Json,
}

// -- Loader ------------------------------------------------------------------

/// Parse configuration from a YAML string without validating credentials.
pub fn parse_config(contents: &str) -> Result<Config, SignedUrlError> {
    let config: Config = serde_yaml::from_str(contents)?;
    Ok(config)
}

/// Load, parse and validate configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, SignedUrlError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config = parse_config(&contents)?;
    config.signing.check()?;
    Ok(config)
}

// -- Tests --------------------------------------------------------------------
