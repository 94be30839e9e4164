use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use emogo_gateway::GatewayBuilder;
use emogo_server::api::AppState;
use emogo_server::config::EmogoConfig;
use emogo_server::store_factory::create_stores;

/// Emogo ingest HTTP server.
#[derive(Parser, Debug)]
#[command(name = "emogo-server", about = "Standalone HTTP server for Emogo")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "emogo.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the tables for the configured record and blob backends, then exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_found = Path::new(&cli.config).exists();
    let config: EmogoConfig = if config_found {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    if let Some(Commands::Migrate) = cli.command {
        emogo_server::telemetry::init_fmt();
        return run_migrate(&config).await;
    }

    let telemetry_guard = emogo_server::telemetry::init(&config.telemetry);

    if !config_found {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let stores = create_stores(&config.records, &config.blobs).await?;

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let public_base_url = config.server.public_base_url(port);

    let gateway = Arc::new(
        GatewayBuilder::new()
            .records(stores.records)
            .blobs(stores.blobs)
            .public_base_url(public_base_url.as_str())
            .list_limit(config.records.list_limit)
            .max_upload_bytes(config.blobs.max_upload_bytes)
            .build()?,
    );
    info!(
        records = gateway.record_backend(),
        blobs = gateway.blob_backend(),
        public_base_url = %public_base_url,
        "gateway ready"
    );

    let state = AppState {
        gateway: Arc::clone(&gateway),
        dashboard_path: Some(config.dashboard.dist_path.clone()),
        dashboard_enabled: config.dashboard.enabled,
    };
    let app = emogo_server::api::router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "emogo-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    if tokio::time::timeout(shutdown_timeout, gateway.shutdown())
        .await
        .is_err()
    {
        tracing::warn!(
            timeout_secs = config.server.shutdown_timeout_seconds,
            "shutdown timeout exceeded, store connections may not have closed cleanly"
        );
    }

    // Flush pending OpenTelemetry spans before exit.
    telemetry_guard.shutdown();

    info!("emogo-server shut down");
    Ok(())
}

/// Run the `migrate` subcommand: opening the stores creates their tables.
async fn run_migrate(config: &EmogoConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        records = %config.records.backend,
        blobs = %config.blobs.backend,
        "running store migrations..."
    );
    let stores = create_stores(&config.records, &config.blobs).await?;
    stores.records.close().await;
    info!("all migrations complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
