//! # medlab-storage
//!
//! Storage abstraction layer for the MedLab server.
//!
//! This crate defines the traits that the storage backends implement. It
//! contains no backend itself; see `medlab-db-postgres` and
//! `medlab-db-memory`.
//!
//! ## Overview
//!
//! [`ClinicStorage`] exposes explicit query methods, each returning a
//! concrete projection (`PatientSummary`, `TestSummary`, `TestResult`)
//! instead of a generic projection mechanism. Multi-row writes go through a
//! [`Transaction`], the unit of work obtained from
//! [`ClinicStorage::begin_transaction`].
//!
//! ## Example
//!
//! ```ignore
//! use medlab_core::{NewMedicalTest, NewMedicalTestResult};
//! use medlab_storage::{ClinicStorage, StorageError};
//!
//! async fn save(storage: &dyn ClinicStorage) -> Result<(), StorageError> {
//!     let mut tx = storage.begin_transaction().await?;
//!     let test = tx
//!         .insert_medical_test(&NewMedicalTest::new(1, Some("Blood test".into())))
//!         .await?;
//!     tx.insert_medical_test_result(&NewMedicalTestResult::new(test.id, "K", Some(4.1)))
//!         .await?;
//!     tx.commit().await
//! }
//! ```

mod error;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::{ClinicStorage, Transaction};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn ClinicStorage>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use medlab_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::{ClinicStorage, Transaction};
    pub use crate::{DynStorage, StorageResult};
}
