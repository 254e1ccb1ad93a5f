use crate::{api, cli::telemetry, gate::GateConfig};
use anyhow::{ensure, Result};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub root: PathBuf,
    pub gate: GateConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the document root is missing or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    ensure!(
        args.root.is_dir(),
        "document root {} is not a directory",
        args.root.display()
    );

    log_startup_args(&args);

    if !args.gate.is_configured() {
        error!("No password configured (SITEGATE_PASSWORD); guarded pages will answer 500");
    }

    let result = api::new(args.port, &args.root, args.gate).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("root", args.root.display().to_string()),
        (
            "password",
            if args.gate.is_configured() { "set" } else { "unset" }.to_string(),
        ),
        ("title", args.gate.title().to_string()),
        ("health", api::HEALTH_PATH.to_string()),
    ];
    log_entries("Startup configuration", &entries);
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", sitegate_banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn sitegate_banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    SITEGATE_BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const SITEGATE_BANNER: &str = r"
   .-----.
  / .---. \
  | |   | |
 _| |___| |_
|  _______  |
| |       | |   S I T E G A T E {VERSION}
| |   O   | |
| |   |   | |
| |_______| |
|___________|";
