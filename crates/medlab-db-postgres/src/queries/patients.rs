//! Queries on the `patients` table.

use chrono::NaiveDate;
use medlab_core::{NewPatient, Patient, PatientSummary};
use medlab_storage::StorageError;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgConnection, PgPool};

use super::{date_to_naive, naive_to_date};
use crate::error::{map_query_error, map_write_error};

const ENTITY: &str = "Patient";

type PatientRow = (i64, String, String, Option<NaiveDate>);

fn into_patient((id, first_name, last_name, birthdate): PatientRow) -> Result<Patient, StorageError> {
    Ok(Patient {
        id,
        first_name,
        last_name,
        birthdate: birthdate.map(naive_to_date).transpose()?,
    })
}

/// Lists every patient as a summary, ordered by id.
pub async fn list(pool: &PgPool) -> Result<Vec<PatientSummary>, StorageError> {
    let rows: Vec<(i64, String, String)> =
        query_as("SELECT id, first_name, last_name FROM patients ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(|e| map_query_error(ENTITY, e))?;

    Ok(rows
        .into_iter()
        .map(|(id, first_name, last_name)| PatientSummary {
            id,
            first_name,
            last_name,
        })
        .collect())
}

/// Counts stored patients.
pub async fn count(pool: &PgPool) -> Result<u64, StorageError> {
    let count: i64 = query_scalar("SELECT COUNT(*) FROM patients")
        .fetch_one(pool)
        .await
        .map_err(|e| map_query_error(ENTITY, e))?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Reads a patient by id.
pub async fn read(pool: &PgPool, id: i64) -> Result<Option<Patient>, StorageError> {
    let row: Option<PatientRow> =
        query_as("SELECT id, first_name, last_name, birthdate FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_query_error(ENTITY, e))?;

    row.map(into_patient).transpose()
}

/// Inserts a patient on `conn` and returns it with its generated id.
pub async fn insert(conn: &mut PgConnection, patient: &NewPatient) -> Result<Patient, StorageError> {
    patient.validate()?;
    let birthdate = patient.birthdate.map(date_to_naive).transpose()?;

    let row: PatientRow = query_as(
        r#"INSERT INTO patients (first_name, last_name, birthdate)
           VALUES ($1, $2, $3)
           RETURNING id, first_name, last_name, birthdate"#,
    )
    .bind(&patient.first_name)
    .bind(&patient.last_name)
    .bind(birthdate)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_write_error(ENTITY, e))?;

    into_patient(row)
}
