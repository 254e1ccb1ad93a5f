//! # Sitegate (Shared-Password Document Gate)
//!
//! `sitegate` sits in front of a read-only document site and asks for a single
//! shared password before any page is served. Static sub-resources (scripts,
//! styles, images) pass through untouched so the challenge page and already
//! unlocked pages can load their assets.
//!
//! ## Request Flow
//!
//! Every request goes through the same fixed sequence:
//!
//! 1. **Classification:** paths with a non-`.html` extension bypass the gate.
//! 2. **Session:** a `siteauth=ok` cookie forwards the request to the origin.
//! 3. **Configuration:** without a configured password the gate answers `500`.
//! 4. **Challenge:** `GET` renders the password form; `POST` checks the
//!    submitted `password` and either sets the cookie and redirects back to the
//!    requested page, or re-renders the form with an error (`401`).
//!
//! The gate keeps no state between requests. The session cookie is a fixed
//! capability valid for seven days; it is not signed and is not bound to the
//! configured password.

pub mod api;
pub mod cli;
pub mod gate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
