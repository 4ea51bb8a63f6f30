mod cli;
mod commands;
mod config;
mod http;
mod realtime;
mod state;
mod wiring;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::CommandError;
use crate::config::{AppConfig, ConfigError};
use crate::http::HttpError;
use crate::state::AppState;
use crate::wiring::WiringError;
use bugboard_infra::realtime::RealtimeError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("http error: {0}")]
    Http(#[from] HttpError),
    #[error("realtime error: {0}")]
    Realtime(#[from] RealtimeError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    config::load_dotenv()?;
    let config = config::AppConfig::from_env()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    let state = wiring::build_state(config)?;
    match cli.into_command() {
        Command::Serve => serve(state).await,
        Command::Search(args) => Ok(commands::search(&state, args).await?),
        Command::Tags(args) => Ok(commands::tags(&state, args).await?),
    }
}

async fn serve(state: AppState) -> Result<(), AppError> {
    let addr = state.config.http_addr;
    let http_state = state.clone();
    let mut api_task = tokio::spawn(http::serve(addr, http_state, shutdown_signal()));

    if !state.config.realtime_enabled {
        info!("realtime change feed disabled");
        return Ok(api_task.await??);
    }

    let realtime_task = tokio::spawn(realtime::start(state.clone()));
    let realtime_abort = realtime_task.abort_handle();
    let feed_stopped = tokio::select! {
        res = &mut api_task => {
            realtime_abort.abort();
            res??;
            false
        }
        res = realtime_task => {
            res??;
            true
        }
    };
    if feed_stopped {
        info!("realtime change feed stopped");
        api_task.await??;
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => error!(error = %err, "failed to install ctrl-c handler"),
    }
}
