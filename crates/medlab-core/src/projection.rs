//! Reduced-field views of the entities.
//!
//! These are the shapes the service layer hands to the presentation layer,
//! keeping HTTP payloads decoupled from the table layout.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::field_target;
use crate::medical_test::{MedicalTest, MedicalTestResult};
use crate::patient::Patient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
        }
    }
}

/// Full patient view including derived values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(
        default,
        with = "crate::time::iso_date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthdate: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

field_target!(PatientDetails {
    id,
    first_name,
    last_name,
    full_name,
    birthdate,
    age,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub id: i64,
    pub patient_id: i64,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
}

impl From<&MedicalTest> for TestSummary {
    fn from(test: &MedicalTest) -> Self {
        Self {
            id: test.id,
            patient_id: test.patient_id,
            description: test.description.clone(),
            date_time: test.date_time,
        }
    }
}

/// A (parameter name, parameter value) pair, e.g. `("Ca++", 16.8)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub param_name: String,
    #[serde(default)]
    pub param_value: Option<f32>,
}

impl TestResult {
    pub fn new(param_name: impl Into<String>, param_value: Option<f32>) -> Self {
        Self {
            param_name: param_name.into(),
            param_value,
        }
    }
}

impl From<&MedicalTestResult> for TestResult {
    fn from(result: &MedicalTestResult) -> Self {
        Self {
            param_name: result.param_name.clone(),
            param_value: result.param_value,
        }
    }
}

/// A medical test with its results.
///
/// Doubles as the request body for saving a test: `id` and `dateTime` are
/// assigned by storage and ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetails {
    #[serde(skip_deserializing)]
    pub id: Option<i64>,
    pub patient_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        skip_deserializing,
        serialize_with = "time::serde::rfc3339::option::serialize"
    )]
    pub date_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl TestDetails {
    /// An unsaved test for `patient_id`.
    pub fn new(patient_id: i64, description: impl Into<String>, results: Vec<TestResult>) -> Self {
        Self {
            id: None,
            patient_id,
            description: Some(description.into()),
            date_time: None,
            results,
        }
    }

    pub fn from_parts(summary: TestSummary, results: Vec<TestResult>) -> Self {
        Self {
            id: Some(summary.id),
            patient_id: summary.patient_id,
            description: summary.description,
            date_time: Some(summary.date_time),
            results,
        }
    }
}
