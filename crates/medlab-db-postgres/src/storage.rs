//! `ClinicStorage` implementation backed by PostgreSQL.

use async_trait::async_trait;
use medlab_core::{Patient, PatientSummary, TestResult, TestSummary};
use medlab_storage::{ClinicStorage, StorageError, Transaction};
use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::instrument;

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries;
use crate::transaction::PostgresTransaction;

/// PostgreSQL clinic storage backend.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates a new `PostgresStorage` with the given configuration.
    ///
    /// Creates the connection pool and, when `run_migrations` is set, applies
    /// the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot connect or a migration fails.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin(&self) -> Result<sqlx_postgres::PgTransaction<'static>, StorageError> {
        self.pool.begin().await.map_err(|e| {
            StorageError::transaction_error(format!("Failed to begin transaction: {e}"))
        })
    }
}

#[async_trait]
impl ClinicStorage for PostgresStorage {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>, StorageError> {
        queries::patients::list(&self.pool).await
    }

    async fn count_patients(&self) -> Result<u64, StorageError> {
        queries::patients::count(&self.pool).await
    }

    async fn read_patient(&self, id: i64) -> Result<Option<Patient>, StorageError> {
        queries::patients::read(&self.pool, id).await
    }

    /// Lists medical tests in a read-only transaction at READ UNCOMMITTED.
    ///
    /// PostgreSQL treats READ UNCOMMITTED as READ COMMITTED, so rows of
    /// transactions still in progress are never returned.
    #[instrument(skip(self))]
    async fn list_medical_tests(&self) -> Result<Vec<TestSummary>, StorageError> {
        let mut tx = self.begin().await?;
        query("SET TRANSACTION ISOLATION LEVEL READ UNCOMMITTED READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::transaction_error(format!("Failed to set isolation level: {e}"))
            })?;

        let tests = queries::medical_tests::list(&mut *tx).await?;

        tx.commit().await.map_err(|e| {
            StorageError::transaction_error(format!("Failed to commit transaction: {e}"))
        })?;
        Ok(tests)
    }

    async fn list_medical_tests_of_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<TestSummary>, StorageError> {
        queries::medical_tests::list_of_patient(&self.pool, patient_id).await
    }

    async fn read_medical_test(&self, id: i64) -> Result<Option<TestSummary>, StorageError> {
        queries::medical_tests::read(&self.pool, id).await
    }

    async fn list_results_of_medical_test(
        &self,
        medical_test_id: i64,
    ) -> Result<Vec<TestResult>, StorageError> {
        queries::medical_tests::list_results(&self.pool, medical_test_id).await
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError> {
        let tx = self.begin().await?;
        tracing::debug!("Transaction started");
        Ok(Box::new(PostgresTransaction::new(tx)))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        pool::ping(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
