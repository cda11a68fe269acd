//! Load a license and check the services this process needs.
//!
//! # Running
//!
//! ```bash
//! export LICENSE_SERVICE_URL="https://licenses.example.com/licenses"
//! export LICENSE_ID="your-license-id"
//! export LICENSE_KEY="your-license-key"
//! export LICENSE_SECRET="shared encryption secret"
//! cargo run --example load_and_validate -- sms email
//! ```
//!
//! The first run fetches the license and saves it under the data directory;
//! later runs read the saved copy.

use license_agent::{AesGcmCrypto, AgentConfig, LicenseAgent, LicenseError};
use std::sync::Arc;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        eprintln!("Set {} environment variable", name);
        std::process::exit(2);
    })
}

fn main() {
    let services: Vec<String> = std::env::args().skip(1).collect();
    let services: Vec<&str> = services.iter().map(String::as_str).collect();

    let location = match AgentConfig::default_location("license-agent-demo") {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = AgentConfig::new(
        env("LICENSE_SERVICE_URL"),
        location,
        env("LICENSE_ID"),
        env("LICENSE_KEY"),
    );
    let crypto = Arc::new(AesGcmCrypto::from_passphrase(&env("LICENSE_SECRET")));

    let agent = match LicenseAgent::spawn(config, crypto) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = agent.load().and_then(|_| agent.save()) {
        eprintln!("Could not load license: {}", e);
        std::process::exit(1);
    }

    match agent.validate(&services) {
        Ok(()) => {
            let license = agent.license().ok();
            println!("✓ License valid for {:?}", services);
            if let Some(license) = license {
                println!("  Entitled: {:?}", license.services);
                println!("  Expires: {}", license.expires_at);
            }
        }
        Err(LicenseError::ServiceNotAllowed { service }) => {
            eprintln!("License does not cover service: {}", service);
            std::process::exit(1);
        }
        Err(e) if e.is_validation_failure() => {
            eprintln!("License rejected: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
