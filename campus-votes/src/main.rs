use campus_votes::server::state::AppState;
use campus_votes::server::{create_app, create_cors_layer, run_server, shutdown_signal};
use campus_votes::telemetry::init_tracing;
use campus_votes::{AppConfig, Dependencies, ServerError};
use campus_votes_engine::cooldown::spawn_reaper;
use dotenv::dotenv;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Main entry point for the Campus Votes service.
///
/// Loads the configuration, sets up tracing and dependencies, starts the
/// cooldown sweep and serves HTTP until a shutdown signal arrives.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format)?;

    info!("Starting Campus Votes service");

    let dependencies = match Dependencies::new(&config).await {
        Ok(dependencies) => {
            info!("Dependencies initialized successfully");
            dependencies
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let reaper = spawn_reaper(
        dependencies.cooldown.clone(),
        config.cooldown.sweep_interval,
        shutdown_rx,
    );

    let app = create_app(
        AppState::new(&dependencies),
        create_cors_layer(config.cors_origins.clone()),
    );
    let result = run_server(app, config.server_addr, shutdown_signal()).await;

    let _ = shutdown_tx.send(());
    if let Err(e) = reaper.await {
        error!(error = %e, "Cooldown reaper task failed");
    }

    match result {
        Ok(()) => {
            info!("Campus Votes service stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Campus Votes service failed");
            Err(e)
        }
    }
}
