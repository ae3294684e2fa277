mod config;
mod routes;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use gatekit_access::{RolePermissions, RouteRegistry};
use gatekit_auth::{InMemoryDirectory, axum_ext::AuthState, build_guard};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// GateKit - membership platform API gateway
#[derive(Parser)]
#[command(name = "gatekit-server")]
#[command(about = "GateKit - membership platform API gateway")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gatekit={default_level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        let host = config
            .server
            .bind_addr
            .rsplit_once(':')
            .map_or("127.0.0.1", |(host, _)| host)
            .to_owned();
        config.server.bind_addr = format!("{host}:{port}");
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Check => check(&config),
        Commands::Run => run(&config).await,
    }
}

fn check(config: &AppConfig) -> Result<()> {
    config.bind_addr()?;
    build_auth_state(config)?;
    println!("configuration OK");
    Ok(())
}

fn build_auth_state(config: &AppConfig) -> Result<AuthState> {
    let registry = RouteRegistry::new(routes::protected_route_actions())
        .context("building route registry")?;
    let directory = InMemoryDirectory::new(config.directory.users.iter().cloned());
    tracing::info!(users = directory.len(), "loaded in-memory user directory");

    let guard = build_guard(
        &config.auth,
        Arc::new(directory),
        Arc::new(registry),
        Arc::new(RolePermissions::standard()),
    )
    .context("building auth guard")?;
    Ok(AuthState::new(Arc::new(guard)))
}

async fn run(config: &AppConfig) -> Result<()> {
    // Process-level instance ID, generated once at startup for log
    // correlation.
    let instance_id = uuid::Uuid::new_v4();
    tracing::info!(instance_id = %instance_id, "starting gatekit-server");

    let addr = config.bind_addr()?;
    let state = build_auth_state(config)?;
    let router = routes::build_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "shutdown signal listener failed");
            }
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
