//! License agent configuration.

use crate::LicenseError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for the remote license fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// File name used by [`AgentConfig::default_location`].
pub const DEFAULT_FILE_NAME: &str = "license.bin";

/// Configuration for a [`LicenseAgent`](crate::LicenseAgent).
///
/// Fixed for the lifetime of the agent.
#[derive(Clone)]
pub struct AgentConfig {
    /// Base URL of the license issuance service (e.g., "https://licenses.example.com/licenses")
    pub service_url: String,

    /// Path of the encrypted license file.
    pub location: PathBuf,

    /// License identifier, appended to `service_url` when fetching.
    pub license_id: String,

    /// Authentication key. Sent encrypted and hex-encoded in the Authorization header.
    pub key: String,

    /// Request timeout for the remote fetch.
    pub fetch_timeout: Duration,
}

impl AgentConfig {
    /// Create a configuration with the default fetch timeout.
    pub fn new(
        service_url: impl Into<String>,
        location: impl Into<PathBuf>,
        license_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            service_url: service_url.into(),
            location: location.into(),
            license_id: license_id.into(),
            key: key.into(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Override the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Default license path: `dirs::data_dir()/<namespace>/license.bin`.
    pub fn default_location(namespace: &str) -> Result<PathBuf, LicenseError> {
        if namespace.is_empty() {
            return Err(LicenseError::ConfigError(
                "namespace cannot be empty".to_string(),
            ));
        }
        let base_dir = dirs::data_dir().ok_or_else(|| {
            LicenseError::ConfigError("Could not find data directory".to_string())
        })?;
        Ok(base_dir.join(namespace).join(DEFAULT_FILE_NAME))
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), LicenseError> {
        if self.service_url.is_empty() {
            return Err(LicenseError::ConfigError(
                "service_url cannot be empty".to_string(),
            ));
        }
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(LicenseError::ConfigError(format!(
                "service_url must be an http(s) URL, got {}",
                self.service_url
            )));
        }
        if self.license_id.is_empty() {
            return Err(LicenseError::ConfigError(
                "license_id cannot be empty".to_string(),
            ));
        }
        if self.key.is_empty() {
            return Err(LicenseError::ConfigError("key cannot be empty".to_string()));
        }
        if self.location.as_os_str().is_empty() {
            return Err(LicenseError::ConfigError(
                "location cannot be empty".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(LicenseError::ConfigError(
                "fetch_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("service_url", &self.service_url)
            .field("location", &self.location)
            .field("license_id", &self.license_id)
            .field("key", &"<redacted>")
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}
