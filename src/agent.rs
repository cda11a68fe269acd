//! License agent - the main public API.
//!
//! The `LicenseAgent` owns the decrypted license and serializes every
//! operation on it through a single worker thread:
//! - Load: read the encrypted license file (or fetch it), decrypt, parse
//! - Save: encode, encrypt and write the held license
//! - Validate: check the held license and its entitled services
//!
//! Callers on any thread send a command to the worker and block until it
//! replies. Only the worker touches the held license, so it needs no lock.
//! Commands are processed one at a time in the order they were queued; a
//! slow fetch during load delays every caller queued behind it.

use crate::cache::file::LicenseStore;
use crate::client::http::{authorization_header, LicenseClient};
use crate::clock::{Clock, SystemClock};
use crate::config::AgentConfig;
use crate::crypto::Crypto;
use crate::policy::access::check_access;
use crate::protocol::models::License;
use crate::LicenseError;
use std::sync::Arc;
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

type Reply<T> = oneshot::Sender<Result<T, LicenseError>>;

/// Requests handled by the worker.
enum Command {
    /// Load and replace the held license.
    Load { reply_to: Reply<()> },

    /// Persist the held license.
    Save { reply_to: Reply<()> },

    /// Validate the held license against the requested services.
    Validate {
        services: Vec<String>,
        reply_to: Reply<()>,
    },

    /// Copy of the held license.
    Snapshot { reply_to: Reply<License> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Load { .. } => "load",
            Command::Save { .. } => "save",
            Command::Validate { .. } => "validate",
            Command::Snapshot { .. } => "snapshot",
        }
    }
}

/// License held by the worker.
enum Held {
    Unloaded,
    Loaded(License),
}

impl Held {
    fn license(&self) -> Result<&License, LicenseError> {
        match self {
            Held::Loaded(license) => Ok(license),
            Held::Unloaded => Err(LicenseError::LicenseNotLoaded),
        }
    }
}

/// License operations exposed to embedding services.
pub trait Agent: Send + Sync {
    /// Load the license, replacing the held one on success.
    fn load(&self) -> Result<(), LicenseError>;

    /// Persist the held license, encrypted, to the local path.
    fn save(&self) -> Result<(), LicenseError>;

    /// Validate the held license and check every service is entitled.
    fn validate(&self, services: &[&str]) -> Result<(), LicenseError>;
}

/// Handle to a running license agent.
///
/// Cloning is cheap; all clones talk to the same worker. The worker exits
/// once every handle has been dropped.
///
/// Calls block the current thread. Do not call them from inside an async
/// runtime; use `spawn_blocking` there.
#[derive(Debug, Clone)]
pub struct LicenseAgent {
    commands: mpsc::UnboundedSender<Command>,
}

impl LicenseAgent {
    /// Validate configuration and start the worker thread.
    ///
    /// Uses the system clock for expiry checks. No license is loaded yet;
    /// call [`LicenseAgent::load`] first.
    ///
    /// # Errors
    /// - `ConfigError` - configuration validation fails
    /// - `TransportError` - HTTP client creation fails
    /// - `AgentUnavailable` - the worker thread could not be spawned
    pub fn spawn(config: AgentConfig, crypto: Arc<dyn Crypto>) -> Result<Self, LicenseError> {
        Self::start(config, crypto, Arc::new(SystemClock))
    }

    /// Start an agent with a custom clock (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn spawn_with_clock(
        config: AgentConfig,
        crypto: Arc<dyn Crypto>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LicenseError> {
        Self::start(config, crypto, clock)
    }

    fn start(
        config: AgentConfig,
        crypto: Arc<dyn Crypto>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LicenseError> {
        config.validate()?;

        let worker = Worker {
            client: LicenseClient::new(&config)?,
            store: LicenseStore::new(config.location.clone()),
            config,
            crypto,
            clock,
            held: Held::Unloaded,
        };

        let (commands, inbox) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("license-agent".to_string())
            .spawn(move || worker.run(inbox))
            .map_err(|e| {
                LicenseError::AgentUnavailable(format!("Failed to spawn worker: {}", e))
            })?;

        Ok(Self { commands })
    }

    /// Load the license from the local file, or fetch it if the file is absent.
    ///
    /// On failure the previously held license, if any, is kept.
    ///
    /// # Errors
    /// - `StoreIO` - the file exists but could not be read
    /// - `TransportError` - the fetch failed
    /// - `CryptoError` - decryption failed
    /// - `ProtocolError` - the decrypted bytes are not a license
    pub fn load(&self) -> Result<(), LicenseError> {
        self.request(|reply_to| Command::Load { reply_to })
    }

    /// Encrypt the held license and write it to the local path.
    ///
    /// # Errors
    /// - `LicenseNotLoaded` - no license is held
    /// - `ProtocolError`, `CryptoError`, `StoreIO` - encode, encrypt or write failed
    pub fn save(&self) -> Result<(), LicenseError> {
        self.request(|reply_to| Command::Save { reply_to })
    }

    /// Validate the held license and check that every service is entitled.
    ///
    /// # Errors
    /// - `LicenseNotLoaded` - no license is held, whatever `services` contains
    /// - `LicenseInactive` / `LicenseExpired` - the license itself is not valid
    /// - `ServiceNotAllowed` - the first requested service the license lacks
    pub fn validate(&self, services: &[&str]) -> Result<(), LicenseError> {
        let services = services.iter().map(|s| s.to_string()).collect();
        self.request(|reply_to| Command::Validate { services, reply_to })
    }

    /// Copy of the held license.
    ///
    /// # Errors
    /// - `LicenseNotLoaded` - no license is held
    pub fn license(&self) -> Result<License, LicenseError> {
        self.request(|reply_to| Command::Snapshot { reply_to })
    }

    fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, LicenseError> {
        let (reply_to, reply) = oneshot::channel();
        self.commands.send(command(reply_to)).map_err(|_| {
            LicenseError::AgentUnavailable("worker is not running".to_string())
        })?;
        reply.blocking_recv().map_err(|_| {
            LicenseError::AgentUnavailable("worker stopped before replying".to_string())
        })?
    }
}

impl Agent for LicenseAgent {
    fn load(&self) -> Result<(), LicenseError> {
        LicenseAgent::load(self)
    }

    fn save(&self) -> Result<(), LicenseError> {
        LicenseAgent::save(self)
    }

    fn validate(&self, services: &[&str]) -> Result<(), LicenseError> {
        LicenseAgent::validate(self, services)
    }
}

/// Sole owner of the held license. Lives on the worker thread.
struct Worker {
    config: AgentConfig,
    crypto: Arc<dyn Crypto>,
    clock: Arc<dyn Clock>,
    client: LicenseClient,
    store: LicenseStore,
    held: Held,
}

impl Worker {
    fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command>) {
        debug!(
            license_id = %self.config.license_id,
            url = self.client.url(),
            "License agent started"
        );

        while let Some(command) = inbox.blocking_recv() {
            let name = command.name();
            debug!(command = name, "Processing license command");

            match command {
                Command::Load { reply_to } => {
                    let result = self.load().map(|license| self.install(license));
                    respond(name, reply_to, result);
                }
                Command::Save { reply_to } => {
                    let result = self.save();
                    respond(name, reply_to, result);
                }
                Command::Validate { services, reply_to } => {
                    let result = self.validate(&services);
                    respond(name, reply_to, result);
                }
                Command::Snapshot { reply_to } => {
                    let result = self.held.license().cloned();
                    respond(name, reply_to, result);
                }
            }
        }

        debug!(license_id = %self.config.license_id, "License agent stopped");
    }

    fn install(&mut self, license: License) {
        info!(
            license_id = %license.id,
            services = license.services.len(),
            expires_at = %license.expires_at,
            "License loaded"
        );
        self.held = Held::Loaded(license);
    }

    fn load(&self) -> Result<License, LicenseError> {
        let blob = match self.store.read()? {
            Some(blob) => blob,
            None => {
                debug!(path = %self.store.path().display(), "License file not found, fetching");
                self.fetch()?
            }
        };

        let data = self.crypto.decrypt(&blob)?;
        License::from_json(&data)
    }

    fn save(&self) -> Result<(), LicenseError> {
        let license = self.held.license()?;

        let data = license.to_json()?;
        let blob = self.crypto.encrypt(&data)?;
        self.store.write(&blob)?;

        info!(license_id = %license.id, path = %self.store.path().display(), "License saved");
        Ok(())
    }

    fn validate(&self, services: &[String]) -> Result<(), LicenseError> {
        let license = self.held.license()?;
        let services: Vec<&str> = services.iter().map(String::as_str).collect();
        check_access(license, &services, self.clock.as_ref())
    }

    fn fetch(&self) -> Result<Vec<u8>, LicenseError> {
        let authorization = authorization_header(self.crypto.as_ref(), &self.config.key)?;
        self.client.fetch(&authorization)
    }
}

fn respond<T>(command: &str, reply_to: Reply<T>, result: Result<T, LicenseError>) {
    if let Err(e) = &result {
        warn!(command, error = %e, "License command failed");
    }
    if reply_to.send(result).is_err() {
        debug!(command, "Caller went away before the reply");
    }
}
