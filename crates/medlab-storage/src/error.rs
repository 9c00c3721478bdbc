//! Storage error types for the storage abstraction layer.
//!
//! This module defines all error types that can occur during storage operations.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A row referenced a parent that does not exist.
    #[error("Foreign key violation on {entity}: {message}")]
    ForeignKeyViolation {
        /// The kind of record being written.
        entity: String,
        /// Which reference could not be resolved.
        message: String,
    },

    /// The record data violates a column constraint.
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Description of the violated constraint.
        message: String,
    },

    /// An error occurred while beginning, committing or rolling back.
    #[error("Transaction error: {message}")]
    TransactionError {
        /// Description of the transaction error.
        message: String,
    },

    /// Failed to connect to the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `ForeignKeyViolation` error.
    #[must_use]
    pub fn foreign_key_violation(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ForeignKeyViolation {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidData` error.
    #[must_use]
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Creates a new `TransactionError` error.
    #[must_use]
    pub fn transaction_error(message: impl Into<String>) -> Self {
        Self::TransactionError {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the data being written
    /// rather than by the backend.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::ForeignKeyViolation { .. } | Self::InvalidData { .. }
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ForeignKeyViolation { .. } => ErrorCategory::Constraint,
            Self::InvalidData { .. } => ErrorCategory::Constraint,
            Self::TransactionError { .. } => ErrorCategory::Transaction,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Core errors only come from validating caller-supplied data.
impl From<medlab_core::CoreError> for StorageError {
    fn from(err: medlab_core::CoreError) -> Self {
        Self::invalid_data(err.to_string())
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Foreign key or column constraint violated.
    Constraint,
    /// Transaction-related error.
    Transaction,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constraint => write!(f, "constraint"),
            Self::Transaction => write!(f, "transaction"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
