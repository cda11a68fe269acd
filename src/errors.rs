//! License agent error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by the license agent and its collaborators.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Save or validate was requested before any successful load.
    #[error("License validation failed: license not loaded")]
    LicenseNotLoaded,

    /// A requested service is not in the license's entitled services.
    #[error("License validation failed: service not allowed: {service}")]
    ServiceNotAllowed {
        /// The first requested service found missing.
        service: String,
    },

    /// The license is marked inactive.
    #[error("License validation failed: license is inactive")]
    LicenseInactive,

    /// The license expiry time has passed.
    #[error("License validation failed: license expired at {expires_at}")]
    LicenseExpired {
        /// When the license stopped being valid.
        expires_at: DateTime<Utc>,
    },

    /// Encryption or decryption failed.
    #[error("Crypto error: {0}")]
    CryptoError(String),

    /// License record could not be encoded or decoded.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// HTTP transport error talking to the license service.
    #[error("License service transport error: {0}")]
    TransportError(String),

    /// Local license file could not be read or written.
    #[error("License store I/O error: {0}")]
    StoreIO(#[from] std::io::Error),

    /// The agent worker is not running.
    #[error("License agent unavailable: {0}")]
    AgentUnavailable(String),
}

impl LicenseError {
    /// Whether this error belongs to the license-validation kind.
    ///
    /// Covers a missing license, a missing service, and the license's own
    /// activity and expiry checks. Collaborator failures (crypto, I/O,
    /// transport, parsing) are not validation failures.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            LicenseError::LicenseNotLoaded
                | LicenseError::ServiceNotAllowed { .. }
                | LicenseError::LicenseInactive
                | LicenseError::LicenseExpired { .. }
        )
    }
}
