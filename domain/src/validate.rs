//! Lightweight input validation helpers. Keep logic minimal and deterministic.
//!
//! Equipment, requirement and service text fields are opaque to the ledger and
//! are not validated here.

use crate::CoreError;

/// A principal is any non-empty token handed over by the host.
pub fn validate_principal(s: &str) -> Result<(), CoreError> {
    if s.is_empty() {
        return Err(CoreError::InvalidPrincipal);
    }
    Ok(())
}

/// Frequencies are strictly positive; zero would make a record due on the
/// same date it was written.
pub fn validate_frequency(days: u32) -> Result<(), CoreError> {
    if days == 0 {
        return Err(CoreError::InvalidFrequency);
    }
    Ok(())
}
