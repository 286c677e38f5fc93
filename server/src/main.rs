//! Staybook server binary.
//!
//! Wires configuration, the connection pool, migrations, the mailer,
//! and the router together, then serves HTTP until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! # Start PostgreSQL
//! docker compose up -d
//!
//! # Run the server
//! cargo run --bin staybook
//! ```

use staybook_core::Config;
use staybook_web::{AppState, ConsoleMailer, Mailer, SmtpMailer, app_router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,staybook=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Staybook server...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        uploads_dir = %config.uploads.dir,
        "Configuration loaded"
    );

    // Connect and migrate
    let pool = staybook_postgres::connect(&config.postgres).await?;
    staybook_postgres::migrate(&pool).await?;
    tracing::info!("Database ready");

    // SMTP when configured, console otherwise
    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(server = %smtp.server, "SMTP mailer enabled");
            Arc::new(SmtpMailer::new(smtp))
        }
        None => {
            tracing::info!("Console mailer enabled (no SMTP configured)");
            Arc::new(ConsoleMailer)
        }
    };

    let state = AppState::new(pool, mailer, config.auth, config.uploads);
    spawn_session_purge(state.sessions.clone());
    let app = app_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Staybook is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

/// Hourly sweep of expired sessions. Expired tokens are already
/// rejected (and deleted) on lookup; this keeps the table from
/// accumulating rows for clients that never come back.
fn spawn_session_purge(sessions: staybook_postgres::PgSessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Expired sessions purged"),
                Err(e) => tracing::warn!(error = %e, "Session purge failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl+C received, shutting down..."),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
