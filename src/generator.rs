//! Signed URL generation with a default configuration.
//!
//! [`Generator`] holds the process-wide default credentials behind a
//! read-write lock.  Install them once at startup with
//! [`Generator::configure`] or [`Generator::with_config`]; reconfiguring
//! while other threads are signing is not supported.

use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::config::SigningConfig;
use crate::errors::SignedUrlError;
use crate::expires::Expires;
use crate::signer::UrlEncoder;

/// Shared handle to the default signing configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    encoder: Arc<RwLock<Option<UrlEncoder>>>,
}

impl Generator {
    /// A generator with no configuration installed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator pre-loaded with `config`.
    pub fn with_config(config: SigningConfig) -> Result<Self, SignedUrlError> {
        let generator = Self::new();
        generator.configure(|c| *c = config)?;
        Ok(generator)
    }

    /// Edit the default configuration in place.
    ///
    /// The closure sees the current configuration (or an empty one on first
    /// use).  The result is validated before it is installed; on error the
    /// previous configuration stays in effect.
    pub fn configure<F>(&self, f: F) -> Result<(), SignedUrlError>
    where
        F: FnOnce(&mut SigningConfig),
    {
        let mut slot = self.encoder.write().unwrap_or_else(|e| e.into_inner());
        let mut config = slot
            .as_ref()
            .map(|enc| enc.config().clone())
            .unwrap_or_default();
        f(&mut config);
        config.check()?;

        debug!(host = %config.host, key_id = %config.key_id, "signing configuration installed");
        *slot = Some(UrlEncoder::new(config));
        Ok(())
    }

    /// A snapshot of the current default configuration, if any.
    pub fn config(&self) -> Option<SigningConfig> {
        let slot = self.encoder.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|enc| enc.config().clone())
    }

    /// Sign `path` with the default configuration.
    pub fn generate(
        &self,
        path: &str,
        expires: impl Into<Expires>,
    ) -> Result<String, SignedUrlError> {
        let slot = self.encoder.read().unwrap_or_else(|e| e.into_inner());
        let encoder = slot.as_ref().ok_or(SignedUrlError::NotConfigured)?;
        let expires = expires.into();

        debug!(path, %expires, "generating signed url");
        Ok(encoder.encode(path, expires))
    }
}

// -- Tests --------------------------------------------------------------------
