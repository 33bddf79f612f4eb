use std::path::PathBuf;

use anyhow::{Context, Result};
use cartera::config::{default_config_path, Config};
use cartera_server::{app_router, build_state, init_tracing};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cartera-server", version, about = "Portfolio dashboard HTTP API")]
struct Cli {
    /// Path to config file (default: ./cartera.toml, then the user data dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config file and CARTERA_LISTEN_ADDR
    #[arg(long)]
    listen: Option<String>,

    /// Keep investments in memory instead of the hosted table
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = Config::load_or_default(&config_path)?;
    config.apply_env();
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }

    let state = build_state(&config, cli.in_memory)?;
    let router = app_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    tracing::info!(
        addr = %config.server.listen_addr,
        config = %config_path.display(),
        "listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
