//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary at compile time. The server never runs them automatically at
//! startup; this command is the only migration path:
//!
//! ```bash
//! gp-cli migrate
//! ```
//!
//! Requires `DATABASE_URL` (loaded from `.env` if present).

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the funnel database migrations.
///
/// # Errors
///
/// Returns [`MigrationError`] if `DATABASE_URL` is unset, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| MigrationError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to funnel database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running funnel migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Funnel migrations complete!");
    Ok(())
}
