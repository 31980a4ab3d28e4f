//! starwatch dashboard entrypoint.
//!
//! A small axum service that runs the discovery pipeline once per request
//! and serves the result as HTML or JSON. The pipeline itself is
//! synchronous and stateless, so each request goes through a blocking task
//! and there is nothing to share between them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod host;
mod pages;

use config::ServerConfig;

#[derive(Debug, Parser)]
#[command(
    name = "starwatch-web",
    about = "Web dashboard for monitoring a running stellar-evolution simulation"
)]
struct Cli {
    /// Path to the TOML config file (default: ~/.starwatch/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listen port; overrides the config file and the PORT variable.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref());
    let port = config.effective_port(cli.port);
    let state = AppState {
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/api/status", get(api_status))
        .route("/api/host", get(api_host))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind listen address");
            std::process::exit(1);
        }
    };
    info!(%addr, "starwatch dashboard listening");

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}

fn init_logging() {
    let debug_enabled = std::env::var("STARWATCH_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn dashboard(State(state): State<AppState>) -> Response {
    let timer = Instant::now();
    let watch = state.config.watch_config();
    let page = tokio::task::spawn_blocking(move || {
        let snapshot = starwatch_core::snapshot::capture(&watch);
        let host = host::collect();
        pages::dashboard(&snapshot, &host)
    })
    .await;

    match page {
        Ok(html) => {
            info!(elapsed = ?timer.elapsed(), "dashboard rendered");
            Html(html).into_response()
        }
        Err(err) => {
            error!(error = %err, "dashboard task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "snapshot failed").into_response()
        }
    }
}

async fn api_status(State(state): State<AppState>) -> Response {
    let watch = state.config.watch_config();
    match tokio::task::spawn_blocking(move || starwatch_core::snapshot::capture(&watch)).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => {
            error!(error = %err, "status task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "snapshot failed").into_response()
        }
    }
}

async fn api_host() -> Response {
    match tokio::task::spawn_blocking(host::collect).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!(error = %err, "host statistics task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "host statistics failed").into_response()
        }
    }
}
