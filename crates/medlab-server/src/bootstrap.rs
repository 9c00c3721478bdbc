//! Startup data seeding.
//!
//! Inserts a few sample patients into an empty database so the API has
//! something to show on first start.

use medlab_core::NewPatient;
use medlab_storage::{ClinicStorage, StorageError};
use tracing::info;

/// Statistics from a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapStats {
    pub patients_inserted: usize,
    pub skipped: bool,
}

fn sample_patients() -> Vec<NewPatient> {
    vec![
        NewPatient::new("Walter", "Paganini"),
        NewPatient::new("Mario", "Rossi"),
        NewPatient::new("Luigi", "Rossi"),
    ]
}

/// Seeds the sample patients if the patient table is empty.
///
/// Idempotent: a table that already holds patients is left alone. The
/// patients are inserted in one transaction.
///
/// # Errors
///
/// Returns an error if storage cannot be queried or the insert fails.
pub async fn seed_patients(storage: &dyn ClinicStorage) -> Result<BootstrapStats, StorageError> {
    let existing = storage.count_patients().await?;
    if existing > 0 {
        info!(existing, "Patients present, skipping seeding");
        return Ok(BootstrapStats {
            patients_inserted: 0,
            skipped: true,
        });
    }

    let created = storage.create_patients(&sample_patients()).await?;
    info!(patients_inserted = created.len(), "Seeded sample patients");
    Ok(BootstrapStats {
        patients_inserted: created.len(),
        skipped: false,
    })
}
