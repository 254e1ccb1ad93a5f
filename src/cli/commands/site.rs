use crate::gate::DEFAULT_TITLE;
use clap::{Arg, Command};

pub const ARG_ROOT: &str = "root";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_TITLE: &str = "title";

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ROOT)
                .short('r')
                .long("root")
                .help("Directory with the documents to serve")
                .env("SITEGATE_ROOT")
                .default_value("public")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long("password")
                .help("Shared password required to view documents")
                .long_help(
                    "Shared password required to view documents. Without it every guarded request is answered with 500.",
                )
                .env("SITEGATE_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TITLE)
                .long("title")
                .help("Title shown on the password page")
                .env("SITEGATE_TITLE")
                .default_value(DEFAULT_TITLE),
        )
}
