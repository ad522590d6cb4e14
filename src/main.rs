use std::process::ExitCode;
use std::sync::Arc;

use hr_engine::api::{AppState, create_router};
use hr_engine::config::ConfigLoader;
use hr_engine::engine::{HrEngine, SystemClock};
use hr_engine::store::InMemoryStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Directory holding `engine.yaml`, overridable with `HR_ENGINE_CONFIG`.
const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_line_number(true)
        .init();

    let config_dir =
        std::env::var("HR_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = match ConfigLoader::load(&config_dir) {
        Ok(loader) => loader.into_config(),
        Err(err) => {
            error!(config_dir = %config_dir, error = %err, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let engine = HrEngine::new(
        Arc::new(InMemoryStore::new()),
        &config,
        Arc::new(SystemClock),
    );
    let app = create_router(AppState::new(engine));

    let bind_address = config.server.bind_address.clone();
    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(bind_address = %bind_address, error = %err, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        organization = %config.organization.name,
        bind_address = %bind_address,
        "HR engine listening"
    );

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "Server terminated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
