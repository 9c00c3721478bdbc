//! PostgreSQL unit of work.
//!
//! Every insert of a [`PostgresTransaction`] runs on the same database
//! transaction, so a medical test and its results are committed together
//! or not at all.

use async_trait::async_trait;
use medlab_core::{
    MedicalTest, MedicalTestResult, NewMedicalTest, NewMedicalTestResult, NewPatient, Patient,
};
use medlab_storage::{StorageError, Transaction};
use sqlx_postgres::PgTransaction;
use tokio::sync::Mutex;

use crate::queries;

/// PostgreSQL transaction wrapper.
///
/// Wraps an sqlx transaction. The transaction rolls back on drop if not
/// explicitly committed.
pub struct PostgresTransaction {
    /// The underlying sqlx transaction.
    /// `Mutex` makes the wrapper `Sync`; `Option` lets commit/rollback take
    /// ownership.
    tx: Mutex<Option<Box<PgTransaction<'static>>>>,
}

impl PostgresTransaction {
    /// Wraps an open sqlx transaction.
    pub fn new(tx: PgTransaction<'static>) -> Self {
        Self {
            tx: Mutex::new(Some(Box::new(tx))),
        }
    }
}

fn completed() -> StorageError {
    StorageError::transaction_error("Transaction already completed (committed or rolled back)")
}

#[async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.lock().await.take() {
            tx.commit().await.map_err(|e| {
                StorageError::transaction_error(format!("Failed to commit transaction: {e}"))
            })?;
            tracing::debug!("Transaction committed successfully");
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.lock().await.take() {
            tx.rollback().await.map_err(|e| {
                StorageError::transaction_error(format!("Failed to rollback transaction: {e}"))
            })?;
            tracing::debug!("Transaction rolled back successfully");
        }
        Ok(())
    }

    async fn insert_patient(&mut self, patient: &NewPatient) -> Result<Patient, StorageError> {
        let tx = self.tx.get_mut().as_deref_mut().ok_or_else(completed)?;
        queries::patients::insert(&mut **tx, patient).await
    }

    async fn insert_medical_test(
        &mut self,
        test: &NewMedicalTest,
    ) -> Result<MedicalTest, StorageError> {
        let tx = self.tx.get_mut().as_deref_mut().ok_or_else(completed)?;
        queries::medical_tests::insert(&mut **tx, test).await
    }

    async fn insert_medical_test_result(
        &mut self,
        result: &NewMedicalTestResult,
    ) -> Result<MedicalTestResult, StorageError> {
        let tx = self.tx.get_mut().as_deref_mut().ok_or_else(completed)?;
        queries::medical_tests::insert_result(&mut **tx, result).await
    }
}

impl Drop for PostgresTransaction {
    /// sqlx's own `Drop` issues the ROLLBACK; this only reports it.
    fn drop(&mut self) {
        if self.tx.get_mut().is_some() {
            tracing::warn!(
                "PostgresTransaction dropped without explicit commit/rollback - will auto-rollback"
            );
        }
    }
}
