//! Database migration management for the PostgreSQL storage backend.
//!
//! This module uses embedded migrations for single-binary deployment.

use sqlx_core::migrate::{Migration, MigrationType};
use sqlx_postgres::PgPool;
use std::borrow::Cow;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// Macro to define embedded migrations at compile time.
///
/// Add new migrations here in chronological order. Each migration is a
/// tuple of (version, description, sql).
macro_rules! embedded_migrations {
    () => {
        &[(
            20241213000001i64,
            "clinic_schema",
            include_str!("../../migrations/20241213000001_clinic_schema.sql"),
        )]
    };
}

/// Builds a vector of Migration structs from embedded migration data.
fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Runs all pending database migrations.
///
/// Applied migrations are tracked in the `_sqlx_migrations` table, so
/// running this on every startup is safe.
///
/// To add a new migration, create the SQL file in `migrations/` and add an
/// entry to `embedded_migrations!()`.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    info!("Running database migrations (embedded)");

    let migrations = build_migrations();
    info!("Found {} migration(s) to apply", migrations.len());

    let migrator = sqlx_core::migrate::Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed successfully");

    Ok(())
}
