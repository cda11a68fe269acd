//! Reqwest-based HTTP client for the license issuance service.
//!
//! A license is fetched with `GET <service_url>/<license_id>`, authenticated
//! by the hex-encoded ciphertext of the configured key.

use crate::config::AgentConfig;
use crate::crypto::Crypto;
use crate::LicenseError;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};

/// Blocking client for the license issuance service.
pub struct LicenseClient {
    client: Client,
    url: String,
    user_agent: String,
}

impl LicenseClient {
    /// Create a client from config.
    pub fn new(config: &AgentConfig) -> Result<Self, LicenseError> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| {
                LicenseError::TransportError(format!("Failed to create client: {}", e))
            })?;

        Ok(Self {
            client,
            url: license_url(&config.service_url, &config.license_id),
            user_agent: build_user_agent(),
        })
    }

    /// URL the license is fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the encrypted license blob.
    ///
    /// The body is returned whatever the status code; a non-success status
    /// is only logged; an error body then fails at decrypt or parse time.
    pub fn fetch(&self, authorization: &str) -> Result<Vec<u8>, LicenseError> {
        debug!(url = %self.url, "Fetching license");

        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization)
            .send()
            .map_err(|e| LicenseError::TransportError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %self.url,
                status = status.as_u16(),
                "License service returned non-success status"
            );
        }

        let body = response
            .bytes()
            .map_err(|e| LicenseError::TransportError(format!("Failed to read body: {}", e)))?;

        Ok(body.to_vec())
    }
}

/// Build the Authorization header value: hex of the encrypted key.
pub fn authorization_header(crypto: &dyn Crypto, key: &str) -> Result<String, LicenseError> {
    let sealed = crypto.encrypt(key.as_bytes())?;
    Ok(hex::encode(sealed))
}

/// Join the service base URL and license id.
pub fn license_url(service_url: &str, license_id: &str) -> String {
    format!("{}/{}", service_url.trim_end_matches('/'), license_id)
}

/// User-Agent string: `license-agent/<version>`.
pub fn build_user_agent() -> String {
    format!("license-agent/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReverseCrypto;

    impl Crypto for ReverseCrypto {
        fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, LicenseError> {
            Ok(plaintext.iter().rev().copied().collect())
        }

        fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, LicenseError> {
            self.encrypt(ciphertext)
        }
    }

    struct FailingCrypto;

    impl Crypto for FailingCrypto {
        fn encrypt(&self, _: &[u8]) -> Result<Vec<u8>, LicenseError> {
            Err(LicenseError::CryptoError("no key".to_string()))
        }

        fn decrypt(&self, _: &[u8]) -> Result<Vec<u8>, LicenseError> {
            Err(LicenseError::CryptoError("no key".to_string()))
        }
    }

    fn test_config() -> AgentConfig {
        AgentConfig::new(
            "http://127.0.0.1:9/licenses/",
            "/tmp/license.bin",
            "lic-001",
            "key",
        )
    }

    #[test]
    fn test_license_url() {
        assert_eq!(
            license_url("https://svc.example.com/licenses", "abc"),
            "https://svc.example.com/licenses/abc"
        );
        assert_eq!(
            license_url("https://svc.example.com/licenses/", "abc"),
            "https://svc.example.com/licenses/abc"
        );
    }

    #[test]
    fn test_authorization_header_is_hex_of_ciphertext() {
        let header = authorization_header(&ReverseCrypto, "ab").unwrap();
        assert_eq!(header, "6261");
    }

    #[test]
    fn test_authorization_header_propagates_crypto_error() {
        let result = authorization_header(&FailingCrypto, "ab");
        assert!(matches!(result, Err(LicenseError::CryptoError(_))));
    }

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent();
        assert_eq!(ua, format!("license-agent/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_client_creation() {
        let client = LicenseClient::new(&test_config()).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:9/licenses/lic-001");
    }
}
