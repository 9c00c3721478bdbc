//! Connection pool management for the PostgreSQL storage backend.

use sqlx_core::pool::PoolOptions;
use sqlx_postgres::{PgPool, Postgres};
use tracing::{debug, info, instrument};

use crate::config::PostgresConfig;
use crate::error::{PostgresError, Result};

fn pool_options(config: &PostgresConfig) -> PoolOptions<Postgres> {
    PoolOptions::<Postgres>::new()
        .max_connections(config.max_connections)
        .min_connections(config.effective_min_connections())
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .test_before_acquire(false)
}

/// Creates the connection pool described by `config`.
#[instrument(skip(config), fields(url = %mask_password(&config.url)))]
pub async fn create_pool(config: &PostgresConfig) -> Result<PgPool> {
    config.validate()?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.effective_min_connections(),
        acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
        max_lifetime_secs = config.max_lifetime.as_secs(),
        "Creating PostgreSQL connection pool"
    );

    let pool = pool_options(config).connect(&config.url).await?;
    debug!("PostgreSQL connection pool created");
    Ok(pool)
}

/// Round-trips a trivial query through the pool.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx_core::query::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(PostgresError::from)?;
    Ok(())
}

/// Replaces the password of a database URL with `****` for logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
    {
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        if colon_pos > scheme_end {
            return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
