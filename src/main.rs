//! jester demo application.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request id, trace, timeout)
//!                          │
//!                          ▼
//!                     routing::Dispatcher ──▶ RequestContext (path, method, query)
//!                          │
//!                          ▼
//!                     routing::RouteMatcher (first match in registration order)
//!                          │
//!                ┌─────────┴──────────┐
//!                ▼                    ▼
//!          route handler          fallback / 404
//!                │                    │
//!                └─────────┬──────────┘
//!                          ▼
//!     Client Response ◀─── http::response (JSON, redirect, view, text)
//! ```

use std::path::PathBuf;

use axum::http::StatusCode;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use jester::config::{apply_overrides, load_config, JesterConfig, Overrides};
use jester::observability::{logging, metrics};
use jester::{Action, Dispatcher, HttpServer, RedirectTo, RequestContext, Response, RouteTable, Shutdown};

#[derive(Parser)]
#[command(name = "jester")]
#[command(about = "Minimal web-application framework demo", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the application (default)
    Serve,
    /// Print the registered route table
    Routes,
}

/// Routes of the demo application.
fn routes() -> RouteTable {
    let mut routes = RouteTable::new();
    routes
        .get(
            "/",
            Action::new("HomeController", "index", |_: &RequestContext, _: &[String]| {
                Response::json(&json!({
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                }))
            }),
        )
        .get(
            "/hello/{name}",
            Action::new("HomeController", "hello", |_: &RequestContext, args: &[String]| {
                Response::json(&json!({ "greeting": format!("Hello, {}!", args[0]) }))
            }),
        )
        .get(
            "/welcome/{name}",
            Action::new("HomeController", "welcome", |_: &RequestContext, args: &[String]| {
                Response::view("welcome", json!({ "name": args[0] }))
            }),
        )
        .get(
            "/echo",
            Action::new("DebugController", "echo", |req: &RequestContext, _: &[String]| {
                Response::json(&json!({
                    "path": req.path,
                    "method": req.method.as_str(),
                    "query": req.query,
                }))
            }),
        )
        .get(
            "/teapot",
            Action::new("DebugController", "teapot", |_: &RequestContext, _: &[String]| {
                Response::text(StatusCode::IM_A_TEAPOT, "I'm a teapot")
            }),
        );
    routes
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => JesterConfig::default(),
    };
    let config = apply_overrides(
        config,
        Overrides {
            bind_address: cli.bind,
            log_level: cli.log_level,
        },
    )?;

    logging::init(&config.observability.log_level);

    let mut dispatcher = Dispatcher::new(routes());
    if let Some(fallback) = &config.app.fallback {
        dispatcher = dispatcher.with_fallback(RedirectTo::new(fallback.clone()));
    }

    if let Some(Commands::Routes) = cli.command {
        for route in dispatcher.routes().list() {
            println!("{:<7} {:<20} {}", route.method().as_str(), route.path(), route.handler().name());
        }
        if let Some(fallback) = dispatcher.fallback() {
            println!("{:<7} {:<20} {}", "*", "(fallback)", fallback.name());
        }
        return Ok(());
    }

    tracing::info!("jester v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        views_dir = %config.app.views_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
