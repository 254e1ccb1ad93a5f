//! Session cookie issuance and validation.
//!
//! The cookie is a bare capability: a fixed name carrying a fixed token. It is
//! neither signed nor bound to the configured password, so changing the
//! password does not invalidate cookies that were already issued.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE_NAME: &str = "siteauth";
pub const SESSION_TOKEN: &str = "ok";

/// Seven days.
pub const SESSION_MAX_AGE_SECONDS: u64 = 604_800;

/// Build the `Set-Cookie` value issued after a successful login.
///
/// # Errors
/// Returns an error if the cookie cannot be encoded as a header value.
pub fn session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={SESSION_TOKEN}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECONDS}"
    ))
}

/// True when any `Cookie` header carries the session token.
#[must_use]
pub fn has_session(headers: &HeaderMap) -> bool {
    extract_session_tokens(headers).any(|token| token == SESSION_TOKEN)
}

fn extract_session_tokens(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME).then(|| val.trim())
        })
}
