//! Application services.
//!
//! Services sit between the HTTP handlers and storage: they own the units of
//! work, turn entities into the projections handed to the presentation layer,
//! and classify failures as [`ServiceError`].

pub mod patients;

use medlab_api::ApiError;
use medlab_core::MappingError;
use medlab_storage::StorageError;

pub use medical_tests::MedicalTestsService;
pub use patients::PatientsService;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    InvalidInput(String),

    /// Saving failed and was rolled back. The cause is kept for logs only.
    #[error("failed to save {what}")]
    SaveFailed {
        what: &'static str,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => ApiError::not_found(err.to_string()),
            ServiceError::InvalidInput(message) => ApiError::unprocessable_entity(message),
            ServiceError::SaveFailed { what, source } => {
                if source.is_constraint_violation() {
                    ApiError::unprocessable_entity(format!("failed to save {what}: {source}"))
                } else {
                    ApiError::internal(format!("failed to save {what}"))
                }
            }
            ServiceError::Storage(e) => match e {
                StorageError::ConnectionError { .. } => {
                    ApiError::service_unavailable("storage unavailable")
                }
                _ => ApiError::internal("storage error"),
            },
            ServiceError::Mapping(_) => ApiError::internal("failed to build response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let api: ApiError = ServiceError::not_found("Patient", 7).into();
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api.message(), "Patient 7 not found");

        let api: ApiError = ServiceError::SaveFailed {
            what: "medical test",
            source: StorageError::foreign_key_violation("MedicalTest", "patient 9 does not exist"),
        }
        .into();
        assert_eq!(api.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let api: ApiError = ServiceError::SaveFailed {
            what: "medical test",
            source: StorageError::internal("disk on fire"),
        }
        .into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message(), "failed to save medical test");

        let api: ApiError = ServiceError::Storage(StorageError::connection_error("down")).into();
        assert_eq!(api.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
