use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use pmoigd::{IgdConfig, IgdError, PromptInput, add_port_mapping};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_RECOVERABLE: u8 = 1;
const EXIT_SETUP: u8 = 2;

fn main() -> ExitCode {
    // RUST_LOG wins over the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            let setup = e
                .downcast_ref::<IgdError>()
                .is_some_and(IgdError::is_setup_fatal);
            ExitCode::from(if setup { EXIT_SETUP } else { EXIT_RECOVERABLE })
        }
    }
}

fn run() -> Result<()> {
    // optional first argument: configuration file path
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = IgdConfig::load(config_path.as_deref()).context("Cannot load configuration")?;

    info!("🔎 Searching for {}...", config.device_type);

    let stdin = io::stdin();
    let mut input = PromptInput::new(stdin.lock(), io::stdout());
    let outcome = add_port_mapping(&config, &mut input)?;

    println!("{}", outcome.control_url);
    println!("Response status: {}", outcome.response.status);
    println!("Response body: {}", outcome.response.body_text());
    Ok(())
}
