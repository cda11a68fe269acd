//! Service entitlement enforcement.

use crate::clock::Clock;
use crate::protocol::models::License;
use crate::LicenseError;

/// Check that every requested service is entitled by the license.
///
/// Services are checked in the given order and the first missing one is
/// reported. An empty request always passes.
///
/// # Returns
/// * `Ok(())` - All services present
/// * `Err(ServiceNotAllowed)` - A requested service is missing
pub fn check_services(license: &License, services: &[&str]) -> Result<(), LicenseError> {
    match services.iter().find(|s| !license.has_service(s)) {
        Some(missing) => Err(LicenseError::ServiceNotAllowed {
            service: (*missing).to_string(),
        }),
        None => Ok(()),
    }
}

/// Full access check: license validity first, then service entitlements.
pub fn check_access(
    license: &License,
    services: &[&str],
    clock: &dyn Clock,
) -> Result<(), LicenseError> {
    license.validate(clock)?;
    check_services(license, services)
}
