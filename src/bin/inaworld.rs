//! inaworld CLI binary.

use anyhow::Context;
use clap::Parser;
use inaworld::cli::{args::*, commands::*};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = InaworldArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let command = args.command.name();
    execute_command(args).with_context(|| format!("`inaworld {command}` failed"))
}
