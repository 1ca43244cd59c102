use std::process::ExitCode;

use autogest_rust::errors::AppError;
use autogest_rust::{build_state, serve, AppConfig};
use log::error;

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let state = build_state(&config)?;
    serve(&config, state).await
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("arranque abortado: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
