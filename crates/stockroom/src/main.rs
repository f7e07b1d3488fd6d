//! Stockroom - Administration backend for an e-commerce product catalog

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use stockroom_api::{AppState, UploadsConfig, create_router};
use stockroom_auth::JwtManager;
use stockroom_db::{Database, NewAdmin, Role};

/// Stockroom - catalog and administrator management API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "STOCKROOM_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "STOCKROOM_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Stockroom v{}", env!("CARGO_PKG_VERSION"));

    // The token codec cannot operate without a signing secret
    if config.auth.jwt_secret.is_empty() {
        anyhow::bail!("auth.jwt_secret is not set; refusing to start");
    }

    // Create the data directory
    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Create the bootstrap administrator if none exist
    if !db.has_admins().await? {
        info!("No administrators found, creating bootstrap account");
        let password_hash = stockroom_auth::hash_password(&config.auth.bootstrap_password)?;
        db.insert_admin(NewAdmin {
            email: config.auth.bootstrap_email.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
        info!(
            "Bootstrap administrator created ({})",
            config.auth.bootstrap_email
        );
    }

    // Initialize JWT manager
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.token_expiry_hours,
    ));

    // Image-host credentials are optional; without them the signed-upload
    // endpoint reports a server error
    let uploads = config.uploads.as_ref().map(|u| UploadsConfig {
        cloud_name: u.cloud_name.clone(),
        api_key: u.api_key.clone(),
        api_secret: u.api_secret.clone(),
    });

    // Create application state and router
    let state = AppState::new(db, jwt, uploads);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
