use std::process::ExitCode;

use pushstate::config::{DEFAULT_LOG_FILTER, ENV_LOG};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(pushstate::execute() as u8)
}
