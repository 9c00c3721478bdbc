//! # medlab-core
//!
//! Entities, projections and the name-based field mapper shared by every
//! MedLab crate.

pub mod error;
pub mod mapping;
pub mod medical_test;
pub mod patient;
pub mod projection;
pub mod time;

pub use error::{CoreError, Result};
pub use mapping::{FieldSource, FieldTarget, FieldValue, MappingError, map};
pub use medical_test::{MedicalTest, MedicalTestResult, NewMedicalTest, NewMedicalTestResult};
pub use patient::{NewPatient, Patient};
pub use projection::{PatientDetails, PatientSummary, TestDetails, TestResult, TestSummary};
pub use crate::time::{now_utc, today_utc};
