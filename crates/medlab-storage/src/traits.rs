//! Storage traits for the storage abstraction layer.
//!
//! This module defines the core traits that all storage backends must implement.

use async_trait::async_trait;
use medlab_core::{
    MedicalTest, MedicalTestResult, NewMedicalTest, NewMedicalTestResult, NewPatient, Patient,
    PatientSummary, TestResult, TestSummary,
};

use crate::error::StorageError;

/// The main storage trait that all backends must implement.
///
/// Reads are plain queries returning projections. Writes that touch more than
/// one row go through [`Transaction`]. Implementations must be thread-safe
/// (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use medlab_storage::{ClinicStorage, StorageError};
///
/// async fn patient_name(storage: &dyn ClinicStorage, id: i64) -> Result<Option<String>, StorageError> {
///     let patient = storage.read_patient(id).await?;
///     Ok(patient.map(|p| p.full_name()))
/// }
/// ```
#[async_trait]
pub trait ClinicStorage: Send + Sync {
    // ==================== Patients ====================

    /// Returns a summary of every patient, ordered by id.
    async fn list_patients(&self) -> Result<Vec<PatientSummary>, StorageError>;

    /// Returns the number of stored patients.
    async fn count_patients(&self) -> Result<u64, StorageError>;

    /// Reads a patient by id.
    ///
    /// Returns `None` if the patient does not exist.
    async fn read_patient(&self, id: i64) -> Result<Option<Patient>, StorageError>;

    /// Inserts all `patients` atomically and returns them with their ids.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidData` if a patient misses a required
    /// name. Nothing is written in that case.
    async fn create_patients(&self, patients: &[NewPatient]) -> Result<Vec<Patient>, StorageError> {
        let mut tx = self.begin_transaction().await?;
        let mut created = Vec::with_capacity(patients.len());
        for patient in patients {
            match tx.insert_patient(patient).await {
                Ok(stored) => created.push(stored),
                Err(e) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::warn!(error = %rollback_err, "Rollback after failed patient insert failed");
                    }
                    return Err(e);
                }
            }
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Inserts a single patient.
    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, StorageError> {
        self.create_patients(std::slice::from_ref(patient))
            .await?
            .pop()
            .ok_or_else(|| StorageError::internal("Patient insert returned no row"))
    }

    // ==================== Medical tests ====================

    /// Returns a summary of every medical test, ordered by id.
    ///
    /// Backends may serve this at the weakest isolation level they offer, so
    /// tests being saved concurrently may or may not be listed.
    async fn list_medical_tests(&self) -> Result<Vec<TestSummary>, StorageError>;

    /// Returns a summary of every medical test of one patient, ordered by id.
    async fn list_medical_tests_of_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<TestSummary>, StorageError>;

    /// Reads a medical test by id, without its results.
    async fn read_medical_test(&self, id: i64) -> Result<Option<TestSummary>, StorageError>;

    /// Returns the results of one medical test, in insertion order.
    async fn list_results_of_medical_test(
        &self,
        medical_test_id: i64,
    ) -> Result<Vec<TestResult>, StorageError>;

    // ==================== Transactions ====================

    /// Begins a new unit of work.
    ///
    /// The returned transaction must be committed for its writes to become
    /// visible. Rolling it back, or dropping it without commit, discards them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if a transaction cannot be
    /// started.
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError>;

    // ==================== Metadata ====================

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// A unit of work for performing atomic writes.
///
/// Writes within a transaction are invisible to other readers until
/// [`Transaction::commit`]. If an error occurs, the caller rolls back and
/// none of the writes survive.
///
/// # Example
///
/// ```ignore
/// let mut tx = storage.begin_transaction().await?;
/// let test = tx.insert_medical_test(&new_test).await?;
/// tx.insert_medical_test_result(&NewMedicalTestResult::new(test.id, "Ca++", Some(15.6))).await?;
/// tx.commit().await?;
/// ```
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Commits all writes in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if the commit fails.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discards all writes in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TransactionError` if the rollback fails.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;

    /// Inserts a patient and returns it with its generated id.
    async fn insert_patient(&mut self, patient: &NewPatient) -> Result<Patient, StorageError>;

    /// Inserts a medical test, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ForeignKeyViolation` if the patient does not exist.
    async fn insert_medical_test(
        &mut self,
        test: &NewMedicalTest,
    ) -> Result<MedicalTest, StorageError>;

    /// Inserts one result row of a medical test.
    ///
    /// The parent test may be one inserted earlier in this same transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ForeignKeyViolation` if the test does not exist,
    /// `StorageError::InvalidData` if the parameter name is blank.
    async fn insert_medical_test_result(
        &mut self,
        result: &NewMedicalTestResult,
    ) -> Result<MedicalTestResult, StorageError>;
}
