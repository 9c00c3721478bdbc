//! Unit of work for the in-memory backend.

use std::sync::Arc;

use async_trait::async_trait;
use medlab_core::{
    MedicalTest, MedicalTestResult, NewMedicalTest, NewMedicalTestResult, NewPatient, Patient,
    now_utc,
};
use medlab_storage::{StorageError, Transaction};
use tokio::sync::RwLock;

use crate::storage::{Sequences, Tables};

/// Rows written by a transaction but not yet committed.
#[derive(Debug, Default)]
struct Staged {
    patients: Vec<Patient>,
    medical_tests: Vec<MedicalTest>,
    results: Vec<MedicalTestResult>,
}

impl Staged {
    fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.medical_tests.is_empty() && self.results.is_empty()
    }
}

/// An in-memory transaction.
///
/// Inserted rows are staged privately. Foreign keys are checked at insert
/// time against committed rows and rows staged by this transaction. At
/// commit the staged rows are applied under one write lock, so readers see
/// either all of them or none.
///
/// Dropping the transaction without calling `commit()` discards the staged
/// rows.
#[derive(Debug)]
pub struct MemoryTransaction {
    tables: Arc<RwLock<Tables>>,
    sequences: Arc<Sequences>,
    staged: Staged,
    finished: bool,
}

impl MemoryTransaction {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>, sequences: Arc<Sequences>) -> Self {
        Self {
            tables,
            sequences,
            staged: Staged::default(),
            finished: false,
        }
    }

    async fn patient_exists(&self, id: i64) -> bool {
        self.staged.patients.iter().any(|p| p.id == id)
            || self.tables.read().await.patients.contains_key(&id)
    }

    async fn medical_test_exists(&self, id: i64) -> bool {
        self.staged.medical_tests.iter().any(|t| t.id == id)
            || self.tables.read().await.medical_tests.contains_key(&id)
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self: Box<Self>) -> Result<(), StorageError> {
        let staged = std::mem::take(&mut self.staged);
        self.finished = true;

        let mut tables = self.tables.write().await;
        for patient in staged.patients {
            tables.patients.insert(patient.id, patient);
        }
        for test in staged.medical_tests {
            tables.medical_tests.insert(test.id, test);
        }
        for result in staged.results {
            tables.results.insert(result.id, result);
        }
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), StorageError> {
        self.staged = Staged::default();
        self.finished = true;
        Ok(())
    }

    async fn insert_patient(&mut self, patient: &NewPatient) -> Result<Patient, StorageError> {
        patient.validate()?;
        let stored = patient.clone().into_patient(self.sequences.next_patient());
        self.staged.patients.push(stored.clone());
        Ok(stored)
    }

    async fn insert_medical_test(
        &mut self,
        test: &NewMedicalTest,
    ) -> Result<MedicalTest, StorageError> {
        if !self.patient_exists(test.patient_id).await {
            return Err(StorageError::foreign_key_violation(
                "MedicalTest",
                format!("patient {} does not exist", test.patient_id),
            ));
        }
        let stored = test
            .clone()
            .into_medical_test(self.sequences.next_medical_test(), now_utc());
        self.staged.medical_tests.push(stored.clone());
        Ok(stored)
    }

    async fn insert_medical_test_result(
        &mut self,
        result: &NewMedicalTestResult,
    ) -> Result<MedicalTestResult, StorageError> {
        result.validate()?;
        if !self.medical_test_exists(result.medical_test_id).await {
            return Err(StorageError::foreign_key_violation(
                "MedicalTestResult",
                format!("medical test {} does not exist", result.medical_test_id),
            ));
        }
        let stored = result.clone().into_result(self.sequences.next_result());
        self.staged.results.push(stored.clone());
        Ok(stored)
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.finished && !self.staged.is_empty() {
            tracing::warn!(
                patients = self.staged.patients.len(),
                medical_tests = self.staged.medical_tests.len(),
                results = self.staged.results.len(),
                "Transaction dropped without explicit commit or rollback - discarding staged rows"
            );
        }
    }
}
