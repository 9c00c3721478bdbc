use axum::{
    Json,
    extract::{Path, State},
    http::header,
};
use medlab_api::{ApiError, ApiResponse};
use medlab_core::{NewPatient, PatientDetails, PatientSummary, TestSummary};

use super::location;
use crate::extract::JsonBody;
use crate::services::PatientsService;

pub async fn list_patients(
    State(service): State<PatientsService>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    Ok(Json(service.list_patients().await?))
}

pub async fn get_patient(
    State(service): State<PatientsService>,
    Path(id): Path<i64>,
) -> Result<Json<PatientDetails>, ApiError> {
    Ok(Json(service.get_patient(id).await?))
}

pub async fn list_medical_tests_of_patient(
    State(service): State<PatientsService>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TestSummary>>, ApiError> {
    Ok(Json(service.list_medical_tests(id).await?))
}

pub async fn create_patient(
    State(service): State<PatientsService>,
    JsonBody(patient): JsonBody<NewPatient>,
) -> Result<ApiResponse<PatientDetails>, ApiError> {
    let created = service.create_patient(patient).await?;
    let location = location(format!("/patients/{}", created.id))?;
    Ok(ApiResponse::created(created).with_header(header::LOCATION, location))
}
