//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{AccountStore, Database};
use crate::jobs::EmailJob;
use crate::services::{Authenticator, QueueNotifier, SystemClock, TokenService};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize database
    let db = Database::connect(&config).await;
    tracing::info!("Database connected");

    // Initialize the email job queue (separate sqlx pool for apalis)
    let job_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to job queue: {}", e)))?;

    PostgresStorage::setup(&job_pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    let email_storage: PostgresStorage<EmailJob> = PostgresStorage::new(job_pool);
    tracing::info!("Email job queue ready");

    // Wire services
    let accounts = Arc::new(AccountStore::new(db.get_connection()));
    let notifier = Arc::new(QueueNotifier::new(email_storage));
    let tokens = TokenService::from_config(&config, Arc::new(SystemClock));
    let auth_service = Arc::new(Authenticator::new(
        accounts,
        notifier,
        tokens,
        config.activation_base_url.clone(),
    ));

    let app_state = AppState::new(auth_service);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
