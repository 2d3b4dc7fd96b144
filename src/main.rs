//! tele-scope: move the current changeset onto an upstream branch

use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tele_scope::cli::parse_args;
use tele_scope::commands::handle_relocate_command;
use tele_scope::core::config::DEFAULT_LOG_FILTER;

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics are printed by the command itself; RUST_LOG opts into tracing output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(status) => return status.into(),
    };

    let outcome = handle_relocate_command(config).await;
    outcome.status.into()
}
