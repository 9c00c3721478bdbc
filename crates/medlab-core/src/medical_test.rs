use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{CoreError, Result};

/// A medical test taken by exactly one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalTest {
    pub id: i64,
    pub patient_id: i64,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
}

/// One measured parameter of a medical test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalTestResult {
    pub id: i64,
    pub medical_test_id: i64,
    pub param_name: String,
    pub param_value: Option<f32>,
}

/// Insert shape for a medical test. Storage stamps `date_time` at insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicalTest {
    pub patient_id: i64,
    pub description: Option<String>,
}

impl NewMedicalTest {
    pub fn new(patient_id: i64, description: Option<String>) -> Self {
        Self {
            patient_id,
            description,
        }
    }

    pub fn into_medical_test(self, id: i64, date_time: OffsetDateTime) -> MedicalTest {
        MedicalTest {
            id,
            patient_id: self.patient_id,
            description: self.description,
            date_time,
        }
    }
}

/// Insert shape for a result row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicalTestResult {
    pub medical_test_id: i64,
    pub param_name: String,
    pub param_value: Option<f32>,
}

impl NewMedicalTestResult {
    pub fn new(medical_test_id: i64, param_name: impl Into<String>, param_value: Option<f32>) -> Self {
        Self {
            medical_test_id,
            param_name: param_name.into(),
            param_value,
        }
    }

    /// The parameter name column is NOT NULL and must not be blank.
    pub fn validate(&self) -> Result<()> {
        if self.param_name.trim().is_empty() {
            return Err(CoreError::invalid_entity("parameter name is required"));
        }
        Ok(())
    }

    pub fn into_result(self, id: i64) -> MedicalTestResult {
        MedicalTestResult {
            id,
            medical_test_id: self.medical_test_id,
            param_name: self.param_name,
            param_value: self.param_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_into_medical_test_keeps_fields() {
        let stamp = datetime!(2024-03-01 09:15:00 UTC);
        let test = NewMedicalTest::new(3, Some("Blood test".into())).into_medical_test(10, stamp);
        assert_eq!(test.id, 10);
        assert_eq!(test.patient_id, 3);
        assert_eq!(test.description.as_deref(), Some("Blood test"));
        assert_eq!(test.date_time, stamp);
    }

    #[test]
    fn test_result_validation() {
        assert!(NewMedicalTestResult::new(1, "Ca++", Some(15.6)).validate().is_ok());
        assert!(NewMedicalTestResult::new(1, "K", None).validate().is_ok());
        assert!(NewMedicalTestResult::new(1, "", Some(1.0)).validate().is_err());
        assert!(NewMedicalTestResult::new(1, "  ", None).validate().is_err());
    }

    #[test]
    fn test_medical_test_serializes_rfc3339() {
        let test = NewMedicalTest::new(1, None)
            .into_medical_test(7, datetime!(2024-03-01 09:15:00 UTC));
        let json = serde_json::to_value(&test).unwrap();
        assert_eq!(json["patientId"], 1);
        assert_eq!(json["dateTime"], "2024-03-01T09:15:00Z");
        assert!(json["description"].is_null());
    }
}
