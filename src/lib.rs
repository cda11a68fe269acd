//! # license-agent
//!
//! **Serialized access to an encrypted, locally cached service license.**
//!
//! A [`LicenseAgent`] loads a license from an encrypted file (fetching it
//! from the license service when the file is absent), validates it against
//! the services a caller needs, and writes it back encrypted. Any number of
//! threads may call the agent at once; every operation is queued to one
//! worker thread that owns the license, so operations never interleave.
//!
//! ## Quickstart
//!
//! ```no_run
//! use license_agent::{AesGcmCrypto, AgentConfig, LicenseAgent};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), license_agent::LicenseError> {
//!     let config = AgentConfig::new(
//!         "https://licenses.example.com/licenses",
//!         AgentConfig::default_location("my-gateway")?,
//!         "LICENSE-ID",
//!         "LICENSE-KEY",
//!     );
//!     let crypto = Arc::new(AesGcmCrypto::from_passphrase("shared secret"));
//!
//!     let agent = LicenseAgent::spawn(config, crypto)?;
//!     agent.load()?;
//!     agent.save()?;
//!     agent.validate(&["sms", "email"])?;
//!     Ok(())
//! }
//! ```
//!
//! ## Storage and transport
//!
//! - The local file holds `encrypt(json(license))`.
//! - A missing file triggers `GET <service_url>/<license_id>` with
//!   `Authorization: hex(encrypt(key))`; the response body has the same
//!   format as the file.
//! - Fetched licenses are only written to disk by an explicit `save`.
//!
//! ## Validation
//!
//! `validate` fails if no license is loaded, if the license is inactive or
//! expired, or if any requested service is missing from its service list.

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Crypto layer
pub mod crypto;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Persistence layer
pub mod cache;

// Policy layer
pub mod policy;

// Agent (main public API)
pub mod agent;

// Re-exports for public API
pub use agent::{Agent, LicenseAgent};
pub use clock::{Clock, SystemClock};
pub use config::AgentConfig;
pub use crypto::{aead::AesGcmCrypto, Crypto};
pub use errors::LicenseError;
pub use protocol::models::License;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::FixedClock;
