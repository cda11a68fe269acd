//! License record and its JSON encoding.

use crate::clock::Clock;
use crate::LicenseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// License issued by the license service.
///
/// This is the plaintext of the encrypted license blob, both on disk and in
/// the issuance service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// License identifier.
    pub id: String,

    /// Who issued the license.
    #[serde(default)]
    pub issuer: String,

    /// Device the license is bound to.
    #[serde(default)]
    pub device_id: String,

    /// Whether the license is active.
    pub active: bool,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// Expiry time. The license is invalid after this instant.
    pub expires_at: DateTime<Utc>,

    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Who performed the last update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,

    /// Entitled service identifiers.
    #[serde(default)]
    pub services: Vec<String>,

    /// Free-form plan details.
    #[serde(default)]
    pub plan: serde_json::Map<String, serde_json::Value>,
}

impl License {
    /// Check the license's own validity: active and not expired.
    pub fn validate(&self, clock: &dyn Clock) -> Result<(), LicenseError> {
        if !self.active {
            return Err(LicenseError::LicenseInactive);
        }
        if self.is_expired(clock) {
            return Err(LicenseError::LicenseExpired {
                expires_at: self.expires_at,
            });
        }
        Ok(())
    }

    /// Whether the expiry time has passed.
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        clock.now_utc() > self.expires_at
    }

    /// Whether `service` is one of the entitled services.
    pub fn has_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, LicenseError> {
        serde_json::to_vec(self)
            .map_err(|e| LicenseError::ProtocolError(format!("Failed to serialize license: {}", e)))
    }

    /// Parse from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self, LicenseError> {
        serde_json::from_slice(data)
            .map_err(|e| LicenseError::ProtocolError(format!("Failed to parse license: {}", e)))
    }
}
