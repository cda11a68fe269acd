//! Symmetric encryption of license blobs and authentication keys.

pub mod aead;

use crate::LicenseError;

/// Symmetric cipher used to seal the license file, the fetched license body,
/// and the authentication key sent to the license service.
///
/// Implementations report failures as [`LicenseError::CryptoError`].
pub trait Crypto: Send + Sync {
    /// Encrypt an opaque payload.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, LicenseError>;

    /// Decrypt a payload produced by [`Crypto::encrypt`].
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, LicenseError>;
}
