use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use depot_engine::{Engine, EngineConfig};
use depot_server::api::AppState;
use depot_server::auth::build_api_key_table;
use depot_server::config::DepotConfig;

/// Depot archive storage HTTP server.
#[derive(Parser, Debug)]
#[command(name = "depot-server", about = "Standalone HTTP server for Depot")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "depot.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config: DepotConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    depot_server::telemetry::init();

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    // Create the storage backends.
    let (records, settings) = depot_server::factory::create_stores(&config.storage).await?;
    let blobs = depot_server::factory::create_blob_store(&config.storage).await?;
    info!(
        backend = %config.storage.backend,
        blob_root = %config.storage.blob_root,
        "storage initialized"
    );

    // Build the lifecycle engine; this spawns the deletion worker.
    let engine = Engine::builder()
        .records(records)
        .settings(settings)
        .blobs(blobs)
        .config(EngineConfig {
            auto_delete: config.storage.auto_delete,
            delete_delay: Duration::from_secs(config.storage.delete_delay_seconds),
        })
        .build()?;
    let engine = Arc::new(engine);

    // Spawn the periodic cleanup sweeper if enabled.
    let _cleanup_handle = if config.cleanup.enabled {
        let interval = Duration::from_secs(config.cleanup.interval_seconds);
        let sweeper = Arc::clone(&engine);
        info!(interval_seconds = config.cleanup.interval_seconds, "cleanup scheduler enabled");
        Some(tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so we don't run
            // cleanup at startup.
            timer.tick().await;
            loop {
                timer.tick().await;
                match sweeper.run_cleanup(chrono::Utc::now()).await {
                    Ok(report) => {
                        if report.deleted_count > 0 {
                            info!(removed = report.deleted_count, "cleanup removed expired archives");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "scheduled cleanup failed"),
                }
            }
        }))
    } else {
        None
    };

    // Build the API key table if auth is enabled.
    let api_keys = if config.auth.enabled {
        if config.auth.api_keys.is_empty() {
            return Err("auth is enabled but no api_keys are configured".into());
        }
        let table = build_api_key_table(&config.auth.api_keys);
        info!(count = table.len(), "api key auth enabled");
        Some(Arc::new(table))
    } else {
        None
    };

    let state = AppState { engine, api_keys };
    let app = depot_server::api::router(state);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "depot-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("depot-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
