//! The password gate: classification, authentication, and the middleware that
//! ties them together in front of the origin router.

pub mod authenticate;
pub mod challenge;
pub mod classify;
pub mod session;

mod middleware;

pub use self::authenticate::{authenticate, AuthOutcome};
pub use self::classify::{classify, Classification};
pub use self::middleware::guard;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

pub const DEFAULT_TITLE: &str = "Protected documents";

/// Largest accepted login form body.
pub const MAX_FORM_BYTES: usize = 16 * 1024;

/// Immutable gate settings, shared by every request.
#[derive(Debug)]
pub struct GateConfig {
    secret: Option<SecretString>,
    title: String,
}

impl GateConfig {
    /// An empty secret is treated the same as a missing one.
    #[must_use]
    pub fn new(secret: Option<SecretString>, title: impl Into<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.expose_secret().is_empty()),
            title: title.into(),
        }
    }

    #[must_use]
    pub fn secret(&self) -> Option<&SecretString> {
        self.secret.as_ref()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GateError {
    #[error("password is not configured")]
    Configuration,
    #[error("invalid password")]
    AuthenticationFailure { page: String },
    #[error("malformed login request")]
    MalformedRequest,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            // Generic bodies only; never say what was or wasn't configured.
            Self::Configuration => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error").into_response()
            }
            Self::MalformedRequest => (StatusCode::BAD_REQUEST, "Invalid request").into_response(),
            Self::AuthenticationFailure { page } => {
                challenge_response(StatusCode::UNAUTHORIZED, page)
            }
        }
    }
}

pub(crate) fn challenge_response(status: StatusCode, page: String) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, "text/html; charset=utf-8"),
            (axum::http::header::CACHE_CONTROL, "no-store"),
        ],
        page,
    )
        .into_response()
}

/// Put the gate in front of every route (and the fallback) of `origin`.
pub fn protect(origin: Router, config: Arc<GateConfig>) -> Router {
    origin.layer(axum::middleware::from_fn_with_state(config, guard))
}
