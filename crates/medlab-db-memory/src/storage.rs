use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use medlab_core::{
    MedicalTest, MedicalTestResult, Patient, PatientSummary, TestResult, TestSummary,
};
use medlab_storage::{ClinicStorage, StorageError, Transaction};
use tokio::sync::RwLock;

use crate::transaction::MemoryTransaction;

/// Committed rows, keyed by id so iteration follows id order.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) patients: BTreeMap<i64, Patient>,
    pub(crate) medical_tests: BTreeMap<i64, MedicalTest>,
    pub(crate) results: BTreeMap<i64, MedicalTestResult>,
}

/// Identity sequences, one per table.
///
/// Like database sequences, values handed to a transaction that is later
/// rolled back are not reused.
#[derive(Debug)]
pub(crate) struct Sequences {
    patients: AtomicI64,
    medical_tests: AtomicI64,
    results: AtomicI64,
}

impl Sequences {
    fn new() -> Self {
        Self {
            patients: AtomicI64::new(1),
            medical_tests: AtomicI64::new(1),
            results: AtomicI64::new(1),
        }
    }

    pub(crate) fn next_patient(&self) -> i64 {
        self.patients.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn next_medical_test(&self) -> i64 {
        self.medical_tests.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn next_result(&self) -> i64 {
        self.results.fetch_add(1, Ordering::SeqCst)
    }
}

/// In-memory clinic storage backend.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    pub(crate) tables: Arc<RwLock<Tables>>,
    pub(crate) sequences: Arc<Sequences>,
}

impl InMemoryStorage {
    /// Creates a new, empty in-memory storage.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            sequences: Arc::new(Sequences::new()),
        }
    }

    /// Number of committed medical tests.
    pub async fn count_medical_tests(&self) -> usize {
        self.tables.read().await.medical_tests.len()
    }

    /// Number of committed result rows.
    pub async fn count_results(&self) -> usize {
        self.tables.read().await.results.len()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClinicStorage for InMemoryStorage {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.values().map(PatientSummary::from).collect())
    }

    async fn count_patients(&self) -> Result<u64, StorageError> {
        Ok(self.tables.read().await.patients.len() as u64)
    }

    async fn read_patient(&self, id: i64) -> Result<Option<Patient>, StorageError> {
        Ok(self.tables.read().await.patients.get(&id).cloned())
    }

    async fn list_medical_tests(&self) -> Result<Vec<TestSummary>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.medical_tests.values().map(TestSummary::from).collect())
    }

    async fn list_medical_tests_of_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<TestSummary>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .medical_tests
            .values()
            .filter(|test| test.patient_id == patient_id)
            .map(TestSummary::from)
            .collect())
    }

    async fn read_medical_test(&self, id: i64) -> Result<Option<TestSummary>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.medical_tests.get(&id).map(TestSummary::from))
    }

    async fn list_results_of_medical_test(
        &self,
        medical_test_id: i64,
    ) -> Result<Vec<TestResult>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .values()
            .filter(|result| result.medical_test_id == medical_test_id)
            .map(TestResult::from)
            .collect())
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError> {
        Ok(Box::new(MemoryTransaction::new(
            self.tables.clone(),
            self.sequences.clone(),
        )))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medlab_core::{NewMedicalTest, NewMedicalTestResult, NewPatient};

    async fn seeded() -> InMemoryStorage {
        let storage = InMemoryStorage::new();
        storage
            .create_patients(&[
                NewPatient::new("Walter", "Paganini"),
                NewPatient::new("Mario", "Rossi"),
            ])
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_patients_get_sequential_ids() {
        let storage = seeded().await;
        let patients = storage.list_patients().await.unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].id, 1);
        assert_eq!(patients[0].first_name, "Walter");
        assert_eq!(patients[1].id, 2);
        assert_eq!(storage.count_patients().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_read_patient() {
        let storage = seeded().await;
        let patient = storage.read_patient(2).await.unwrap().unwrap();
        assert_eq!(patient.full_name(), "Mario Rossi");
        assert!(storage.read_patient(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_patients_is_all_or_nothing() {
        let storage = seeded().await;
        let err = storage
            .create_patients(&[NewPatient::new("Luigi", "Verdi"), NewPatient::new("", "X")])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidData { .. }));
        assert_eq!(storage.count_patients().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_medical_test_queries() {
        let storage = seeded().await;
        let mut tx = storage.begin_transaction().await.unwrap();
        let first = tx
            .insert_medical_test(&NewMedicalTest::new(1, Some("Blood test".into())))
            .await
            .unwrap();
        tx.insert_medical_test_result(&NewMedicalTestResult::new(first.id, "Ca++", Some(15.6)))
            .await
            .unwrap();
        tx.insert_medical_test_result(&NewMedicalTestResult::new(first.id, "K", None))
            .await
            .unwrap();
        tx.insert_medical_test(&NewMedicalTest::new(2, None))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(storage.list_medical_tests().await.unwrap().len(), 2);

        let of_walter = storage.list_medical_tests_of_patient(1).await.unwrap();
        assert_eq!(of_walter.len(), 1);
        assert_eq!(of_walter[0].description.as_deref(), Some("Blood test"));
        assert!(storage.list_medical_tests_of_patient(99).await.unwrap().is_empty());

        let summary = storage.read_medical_test(first.id).await.unwrap().unwrap();
        assert_eq!(summary.patient_id, 1);
        assert!(storage.read_medical_test(99).await.unwrap().is_none());

        let results = storage.list_results_of_medical_test(first.id).await.unwrap();
        assert_eq!(
            results,
            vec![TestResult::new("Ca++", Some(15.6)), TestResult::new("K", None)]
        );
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let storage = seeded().await;
        let clone = storage.clone();
        clone
            .create_patient(&NewPatient::new("Anna", "Bianchi"))
            .await
            .unwrap();
        assert_eq!(storage.count_patients().await.unwrap(), 3);
        assert_eq!(storage.backend_name(), "memory");
        storage.ping().await.unwrap();
    }
}
