use thiserror::Error;

/// Core error types for MedLab entities
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid entity data: {message}")]
    InvalidEntity { message: String },
}

impl CoreError {
    /// Create a new InvalidDate error
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate(message.into())
    }

    /// Create a new InvalidEntity error
    pub fn invalid_entity(message: impl Into<String>) -> Self {
        Self::InvalidEntity {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
