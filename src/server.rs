//! Server assembly - Axum setup and router configuration
//!
//! Builds the router over a single shared database connection and runs it
//! with graceful shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum::routing::{any, get};
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::db::Database;
use crate::repo::ItemRepo;
use crate::routes;

/// Server command-line arguments. Read once at startup.
#[derive(Parser, Debug, Clone)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3030")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    /// SQLite database file path
    #[arg(long, default_value = "items.db")]
    pub db_path: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Echo raw storage-error detail in 500 responses. Keep off in production.
    #[arg(long)]
    pub debug: bool,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            port: 3030,
            bind: "127.0.0.1".to_string(),
            db_path: PathBuf::from("items.db"),
            timeout: 30,
            debug: false,
        }
    }
}

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub repo: ItemRepo,
    pub debug: bool,
    pub start_time: Instant,
}

/// Run the server with the given arguments.
pub async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    info!("Opening database at {}", args.db_path.display());
    let db = Database::open(&args.db_path)?;

    if args.debug {
        warn!("Debug mode: raw storage errors will be echoed to clients");
    }

    let app = create_router(db, args.debug, args.timeout);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Starting items-server on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the Axum router with all routes.
pub fn create_router(db: Database, debug: bool, timeout_secs: u64) -> Router {
    let state = AppState {
        repo: ItemRepo::new(db.clone()),
        db,
        debug,
        start_time: Instant::now(),
    };

    // CORS layer for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Middleware stack
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
        .layer(cors);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/items", any(routes::dispatch))
        .fallback(routes::not_found)
        .layer(middleware)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
