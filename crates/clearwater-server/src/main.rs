use anyhow::Context;
use clap::Parser;
use clearwater_server::{build_router, telemetry, AppState, ServerConfig};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "clearwater-server", version, about = "Chat over post-trade and inventory data")]
struct Cli {
    /// Configuration file (defaults to ./clearwater.toml when present)
    #[arg(short, long, env = "CLEARWATER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, overriding the configuration
    #[arg(long, env = "CLEARWATER_HOST")]
    host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long, env = "CLEARWATER_PORT")]
    port: Option<u16>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.http.host = host;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    telemetry::init_tracing(&config.logging);
    info!("Starting Clearwater backend server");

    let state = AppState::from_config(&config)?;

    // sweep idle sessions in the background
    let registry = state.registry().clone();
    let sweep_interval = config.registry.sweep_interval();
    let sweeper = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = registry.evict_expired();
            debug!(evicted, live = registry.len(), "Session sweep finished");
        }
    });

    let app = build_router(state, &config.http);
    let addr = config.http.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Clearwater running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
