use clap::Parser;
use pgq::config::Config;
use pgq::{exec, session};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays parseable JSON; RUST_LOG widens the
    // default error-only filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    debug!(session = config.session, "starting");

    let result = if config.session {
        session::run_session(&config).await
    } else {
        exec::run_once(&config).await
    };

    if let Err(e) = result {
        eprintln!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
