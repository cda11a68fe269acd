//! AES-256-GCM implementation of [`Crypto`].
//!
//! Blob layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! A fresh random nonce is drawn for every encryption.

use crate::crypto::Crypto;
use crate::LicenseError;
use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;

/// AES-256 key length in bytes.
pub const KEY_BYTES: usize = 32;

/// GCM nonce length in bytes.
pub const NONCE_BYTES: usize = 12;

/// AES-256-GCM cipher with a fixed key.
#[derive(Clone)]
pub struct AesGcmCrypto {
    cipher: Aes256Gcm,
}

impl AesGcmCrypto {
    /// Create a cipher from raw key bytes.
    pub fn new(key: [u8; KEY_BYTES]) -> Self {
        Self {
            cipher: Aes256Gcm::new(&Key::<Aes256Gcm>::from(key)),
        }
    }

    /// Create a cipher from a hex-encoded 32-byte key.
    pub fn from_hex(hex_key: &str) -> Result<Self, LicenseError> {
        let bytes = hex::decode(hex_key)
            .map_err(|e| LicenseError::ConfigError(format!("Invalid key hex: {}", e)))?;
        let key: [u8; KEY_BYTES] = bytes.try_into().map_err(|_| {
            LicenseError::ConfigError(format!("Key must be {} bytes", KEY_BYTES))
        })?;
        Ok(Self::new(key))
    }

    /// Derive the key as the SHA-256 digest of a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut key = [0u8; KEY_BYTES];
        key.copy_from_slice(&digest);
        Self::new(key)
    }
}

impl Crypto for AesGcmCrypto {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, LicenseError> {
        let mut nonce_bytes = [0u8; NONCE_BYTES];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::<U12>::from(nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| LicenseError::CryptoError("Encryption failed".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_BYTES + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, LicenseError> {
        if blob.len() < NONCE_BYTES {
            return Err(LicenseError::CryptoError(format!(
                "Ciphertext too short: {} bytes",
                blob.len()
            )));
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_BYTES);
        let nonce: [u8; NONCE_BYTES] = nonce_bytes
            .try_into()
            .map_err(|_| LicenseError::CryptoError("Malformed nonce".to_string()))?;
        self.cipher
            .decrypt(&Nonce::<U12>::from(nonce), ciphertext)
            .map_err(|_| LicenseError::CryptoError("Decryption failed".to_string()))
    }
}

impl fmt::Debug for AesGcmCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesGcmCrypto(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_encrypt_then_decrypt() {
        let crypto = AesGcmCrypto::from_hex(TEST_KEY_HEX).unwrap();
        let blob = crypto.encrypt(b"{\"id\":\"lic-001\"}").unwrap();
        assert_eq!(blob.len(), NONCE_BYTES + 16 + 16);
        assert_eq!(crypto.decrypt(&blob).unwrap(), b"{\"id\":\"lic-001\"}");
    }

    #[test]
    fn test_nonce_differs_per_call() {
        let crypto = AesGcmCrypto::from_passphrase("hunter2");
        let a = crypto.encrypt(b"same").unwrap();
        let b = crypto.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = AesGcmCrypto::from_passphrase("right").encrypt(b"payload").unwrap();
        let result = AesGcmCrypto::from_passphrase("wrong").decrypt(&sealed);
        assert!(matches!(result, Err(LicenseError::CryptoError(_))));
    }

    #[test]
    fn test_tampered_blob_fails() {
        let crypto = AesGcmCrypto::from_passphrase("k");
        let mut blob = crypto.encrypt(b"payload").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(crypto.decrypt(&blob).is_err());
    }

    #[test]
    fn test_short_blob_fails() {
        let crypto = AesGcmCrypto::from_passphrase("k");
        assert!(matches!(
            crypto.decrypt(&[0u8; 5]),
            Err(LicenseError::CryptoError(_))
        ));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(AesGcmCrypto::from_hex("zz").is_err());
        assert!(AesGcmCrypto::from_hex("0011").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let crypto = AesGcmCrypto::from_hex(TEST_KEY_HEX).unwrap();
        assert_eq!(format!("{:?}", crypto), "AesGcmCrypto(<redacted>)");
    }
}
