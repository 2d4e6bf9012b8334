/**
 * Server Configuration
 *
 * Loading and validation of server configuration: the user store handle
 * and the listen port. OAuth provider configuration lives with the OAuth
 * plumbing (`auth::oauth::OAuthRegistry::from_env`).
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent startup. A store
 * that fails to initialize is `None` and the server runs without it,
 * answering 503 on the endpoints that need it.
 */

use sqlx::PgPool;

/// Database configuration result
pub type DatabaseConfig = Option<PgPool>;

/// Load and initialize the user store handle
///
/// 1. Reads `DATABASE_URL` from the environment
/// 2. Creates a PostgreSQL connection pool
/// 3. Runs database migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the store is successfully configured
/// - `None` if `DATABASE_URL` is not set or the connection fails
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Store-backed features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Store-backed features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            // Migrations may already have been applied by another instance.
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Listen port, from `SERVER_PORT` with a local-development default
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
}
