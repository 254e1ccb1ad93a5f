use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// Result of checking a submitted password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Password matched; the caller issues the session cookie.
    Success,
    /// Password did not match (or was not submitted).
    Failure,
    /// No usable secret is configured. Nothing was compared.
    Misconfigured,
}

/// Compare a submitted password against the configured secret.
///
/// The comparison is exact (no trimming or case folding) and runs in constant
/// time for inputs of equal length.
#[must_use]
pub fn authenticate(submitted: Option<&str>, configured: Option<&SecretString>) -> AuthOutcome {
    let Some(secret) = configured
        .map(|secret| secret.expose_secret())
        .filter(|secret| !secret.is_empty())
    else {
        return AuthOutcome::Misconfigured;
    };

    let Some(submitted) = submitted else {
        return AuthOutcome::Failure;
    };

    if bool::from(submitted.as_bytes().ct_eq(secret.as_bytes())) {
        AuthOutcome::Success
    } else {
        AuthOutcome::Failure
    }
}
