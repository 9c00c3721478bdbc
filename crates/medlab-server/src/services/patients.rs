use medlab_core::{NewPatient, PatientDetails, PatientSummary, TestSummary, map};
use medlab_storage::DynStorage;
use tracing::instrument;

use super::ServiceError;

/// Patient queries and registration.
#[derive(Clone)]
pub struct PatientsService {
    storage: DynStorage,
}

impl PatientsService {
    pub fn new(storage: DynStorage) -> Self {
        Self { storage }
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientSummary>, ServiceError> {
        Ok(self.storage.list_patients().await?)
    }

    /// Returns the full view of one patient, including full name and age.
    #[instrument(skip(self))]
    pub async fn get_patient(&self, id: i64) -> Result<PatientDetails, ServiceError> {
        let patient = self
            .storage
            .read_patient(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient", id))?;
        Ok(map::<PatientDetails, _>(&patient)?)
    }

    /// Lists the tests of one patient. An unknown patient is reported as not
    /// found rather than as an empty list.
    #[instrument(skip(self))]
    pub async fn list_medical_tests(&self, patient_id: i64) -> Result<Vec<TestSummary>, ServiceError> {
        if self.storage.read_patient(patient_id).await?.is_none() {
            return Err(ServiceError::not_found("Patient", patient_id));
        }
        Ok(self.storage.list_medical_tests_of_patient(patient_id).await?)
    }

    #[instrument(skip(self, patient), fields(last_name = %patient.last_name))]
    pub async fn create_patient(&self, patient: NewPatient) -> Result<PatientDetails, ServiceError> {
        patient
            .validate()
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let stored = self
            .storage
            .create_patient(&patient)
            .await
            .map_err(|source| ServiceError::SaveFailed {
                what: "patient",
                source,
            })?;
        tracing::info!(patient_id = stored.id, "patient registered");
        Ok(map::<PatientDetails, _>(&stored)?)
    }
}
