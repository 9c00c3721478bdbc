//! In-memory storage backend for the MedLab server.
//!
//! This crate provides an in-memory implementation of the `ClinicStorage`
//! trait from `medlab-storage`. Tables live behind a single `tokio` RwLock;
//! transactions stage their rows privately and apply them in one write
//! section at commit.
//!
//! It backs the test suites and the `memory` storage backend setting.
//!
//! # Example
//!
//! ```ignore
//! use medlab_core::NewPatient;
//! use medlab_db_memory::InMemoryStorage;
//! use medlab_storage::ClinicStorage;
//!
//! let storage = InMemoryStorage::new();
//! let patient = storage.create_patient(&NewPatient::new("Walter", "Paganini")).await?;
//! assert_eq!(patient.id, 1);
//! ```

pub mod storage;
pub mod transaction;

pub use medlab_storage::{ClinicStorage, StorageError, Transaction};
pub use storage::InMemoryStorage;
pub use transaction::MemoryTransaction;

/// Creates a new shareable in-memory storage instance.
pub fn create_storage() -> medlab_storage::DynStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
