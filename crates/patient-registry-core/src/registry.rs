//! Patient operations over the record store.
//!
//! Each operation runs a full load → validate → mutate → save cycle while
//! holding the registry lock, so two writers in the same process cannot
//! interleave and lose an update.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::models::{
    sort_patients, NewPatient, Patient, PatientFields, PatientUpdate, SortField, SortOrder,
    ValidationError,
};
use crate::store::{Collection, RecordStore, StoreError};

/// Registry errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Patient already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid patient: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Registry lock poisoned")]
    LockPoisoned,
}

impl<T> From<std::sync::PoisonError<T>> for RegistryError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        RegistryError::LockPoisoned
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Single coordinator for all patient operations.
pub struct PatientRegistry {
    store: Mutex<RecordStore>,
}

impl PatientRegistry {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, RecordStore>> {
        Ok(self.store.lock()?)
    }

    /// All records, validated, in id order.
    pub fn list(&self) -> RegistryResult<Vec<Patient>> {
        let store = self.lock()?;
        materialize(store.load()?)
    }

    /// A single record by id.
    pub fn get(&self, id: &str) -> RegistryResult<Patient> {
        let store = self.lock()?;
        let mut collection = store.load()?;
        let fields = collection
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        Ok(materialize_one(id.to_string(), fields)?)
    }

    /// All records ordered by `field`.
    pub fn sorted(&self, field: SortField, order: SortOrder) -> RegistryResult<Vec<Patient>> {
        let mut patients = self.list()?;
        sort_patients(&mut patients, field, order);
        Ok(patients)
    }

    /// Insert a new record. Fails if the id is taken.
    pub fn create(&self, new: NewPatient) -> RegistryResult<Patient> {
        let patient = Patient::try_from(new)?;

        let store = self.lock()?;
        let mut collection = store.load()?;
        if collection.contains_key(patient.id()) {
            return Err(RegistryError::AlreadyExists(patient.id().to_string()));
        }
        collection.insert(patient.id().to_string(), patient.fields().clone());
        store.save(&collection)?;

        tracing::info!(patient_id = %patient.id(), "Created patient");
        Ok(patient)
    }

    /// Merge `update` into an existing record and persist it.
    pub fn update(&self, id: &str, update: &PatientUpdate) -> RegistryResult<Patient> {
        let store = self.lock()?;
        let mut collection = store.load()?;
        let current = collection
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        let current = materialize_one(id.to_string(), current)?;

        let updated = current.apply(update)?;
        collection.insert(id.to_string(), updated.fields().clone());
        store.save(&collection)?;

        tracing::info!(patient_id = %id, "Updated patient");
        Ok(updated)
    }

    /// Remove a record.
    pub fn delete(&self, id: &str) -> RegistryResult<()> {
        let store = self.lock()?;
        let mut collection = store.load()?;
        if collection.remove(id).is_none() {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        store.save(&collection)?;

        tracing::info!(patient_id = %id, "Deleted patient");
        Ok(())
    }
}

/// Rebuild validated records from stored fields.
///
/// A record that fails validation here was corrupted at rest, so it is a
/// storage error rather than a client error.
fn materialize(collection: Collection) -> RegistryResult<Vec<Patient>> {
    collection
        .into_iter()
        .map(|(id, fields)| materialize_one(id, fields).map_err(Into::into))
        .collect()
}

fn materialize_one(id: String, fields: PatientFields) -> Result<Patient, StoreError> {
    Patient::new(id.clone(), fields).map_err(|source| StoreError::InvalidRecord { id, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Verdict};
    use std::sync::Arc;
    use std::thread;

    fn setup() -> (tempfile::TempDir, PatientRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("patients.json"));
        store.init().unwrap();
        (dir, PatientRegistry::new(store))
    }

    fn new_patient(id: &str) -> NewPatient {
        NewPatient {
            id: id.into(),
            fields: PatientFields {
                name: "Kabir Singh".into(),
                city: "Mumbai".into(),
                age: 42,
                gender: Gender::Male,
                height: 1.8,
                weight: 95.0,
            },
        }
    }

    #[test]
    fn test_create_and_get() {
        let (_dir, registry) = setup();

        let created = registry.create(new_patient("P001")).unwrap();
        let fetched = registry.get("P001").unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.bmi(), 29.32);
        assert_eq!(fetched.verdict(), Verdict::Overweight);
    }

    #[test]
    fn test_create_duplicate() {
        let (_dir, registry) = setup();

        registry.create(new_patient("P001")).unwrap();
        let result = registry.create(new_patient("P001"));
        assert!(matches!(result, Err(RegistryError::AlreadyExists(id)) if id == "P001"));
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_invalid_is_not_persisted() {
        let (_dir, registry) = setup();

        let mut new = new_patient("P001");
        new.fields.height = 0.0;
        assert!(matches!(
            registry.create(new),
            Err(RegistryError::Validation(_))
        ));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_get_missing() {
        let (_dir, registry) = setup();
        assert!(matches!(
            registry.get("P404"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_merges() {
        let (_dir, registry) = setup();
        registry.create(new_patient("P001")).unwrap();

        let update = PatientUpdate {
            city: Some("Chennai".into()),
            ..Default::default()
        };
        let updated = registry.update("P001", &update).unwrap();
        assert_eq!(updated.fields().city, "Chennai");
        assert_eq!(updated.fields().name, "Kabir Singh");

        let fetched = registry.get("P001").unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_update_invalid_keeps_original() {
        let (_dir, registry) = setup();
        registry.create(new_patient("P001")).unwrap();

        let update = PatientUpdate {
            weight: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(
            registry.update("P001", &update),
            Err(RegistryError::Validation(_))
        ));
        assert_eq!(registry.get("P001").unwrap().fields().weight, 95.0);
    }

    #[test]
    fn test_delete() {
        let (_dir, registry) = setup();
        registry.create(new_patient("P001")).unwrap();

        registry.delete("P001").unwrap();
        assert!(matches!(
            registry.get("P001"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.delete("P001"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_record_is_storage_error() {
        let (_dir, registry) = setup();
        let path = registry.lock().unwrap().path().to_path_buf();
        std::fs::write(
            &path,
            r#"{"P001": {"name":"A","city":"B","age":300,"gender":"male","height":1.7,"weight":70}}"#,
        )
        .unwrap();

        assert!(matches!(
            registry.list(),
            Err(RegistryError::Storage(StoreError::InvalidRecord { .. }))
        ));
    }

    #[test]
    fn test_poisoned_lock() {
        let (_dir, registry) = setup();
        let registry = Arc::new(registry);

        let holder = Arc::clone(&registry);
        let result = thread::spawn(move || {
            let _guard = holder.store.lock().unwrap();
            panic!("writer died while holding the registry lock");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(registry.list(), Err(RegistryError::LockPoisoned)));
        assert!(matches!(
            registry.create(new_patient("P001")),
            Err(RegistryError::LockPoisoned)
        ));
    }
}
