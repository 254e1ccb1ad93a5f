use crate::{
    cli::{
        actions::{server::Args, Action},
        commands::{ARG_PASSWORD, ARG_PORT, ARG_ROOT, ARG_TITLE},
    },
    gate::{GateConfig, DEFAULT_TITLE},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let root = matches
        .get_one::<PathBuf>(ARG_ROOT)
        .cloned()
        .context("missing required argument: --root")?;
    let password = matches
        .get_one::<String>(ARG_PASSWORD)
        .cloned()
        .map(SecretString::from);
    let title = matches
        .get_one::<String>(ARG_TITLE)
        .cloned()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Ok(Action::Server(Args {
        port,
        root,
        gate: GateConfig::new(password, title),
    }))
}
