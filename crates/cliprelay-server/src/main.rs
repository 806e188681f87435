//! Cliprelay server - clipboard synchronization over WebSocket for console
//! locations managed by an external device-management service.

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use cliprelay_core::{AimClient, RosterApi};
use cliprelay_server::{config, logging, routes, state};
use reqwest::Url;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use config::Config;
use logging::{LogConfig, LogFormat};
use state::AppState;

/// Cliprelay server - console clipboard relay.
#[derive(Parser, Debug)]
#[command(name = "cliprelay-server")]
#[command(about = "WebSocket clipboard relay for console locations")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "roster=debug").
    /// Can be specified multiple times; targets are prefixed with
    /// "cliprelay::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::info!(target: "cliprelay::startup", "Loaded configuration (port: {})", config.port);

    let roster_url: Url = config.roster.base_url.parse()?;
    let roster: Arc<dyn RosterApi> = Arc::new(AimClient::new(roster_url));
    let state = Arc::new(AppState::new(config.clone(), roster.clone()));

    // Log in to the roster service in the background. Until this lands the
    // token slot stays empty and every clipboard action is dropped as a
    // resolution failure; there is no retry.
    spawn_login(state.clone(), roster);

    let api_routes = Router::new()
        .route("/channel", get(routes::channel::lookup))
        .route("/health", get(routes::health));

    let app = Router::new()
        .nest("/api", api_routes)
        .route("/clipboard", get(routes::ws::upgrade))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "cliprelay::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Authenticate against the roster service and store the session token.
/// Runs asynchronously and doesn't block server startup.
fn spawn_login(state: Arc<AppState>, roster: Arc<dyn RosterApi>) {
    tokio::spawn(async move {
        let Some(credentials) = state.config.credentials() else {
            tracing::error!(
                target: "cliprelay::startup",
                "No roster credentials configured (set AIM_USERNAME/AIM_PASSWORD)"
            );
            return;
        };

        match roster.authenticate(&credentials).await {
            Ok(token) => {
                tracing::info!(target: "cliprelay::startup", "Roster login succeeded");
                state.set_token(token).await;
            }
            Err(e) => {
                tracing::error!(target: "cliprelay::startup", "Roster login failed: {}", e);
            }
        }
    });
}
