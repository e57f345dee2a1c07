use std::{error::Error, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    app::run(app::Cli::parse()).await
}
