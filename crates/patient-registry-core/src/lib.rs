//! Patient Registry Core Library
//!
//! File-backed patient records with server-side derived health metrics.
//!
//! # Architecture
//!
//! ```text
//!   request payload
//!         │
//!         ▼
//!  ┌──────────────┐   validate    ┌──────────────────────────────┐
//!  │   Registry   │──────────────▶│  Patient / PatientUpdate     │
//!  │ (one lock)   │               │  bmi + verdict derived       │
//!  └──────┬───────┘               └──────────────────────────────┘
//!         │ load / save (whole file)
//!         ▼
//!  ┌──────────────┐
//!  │ RecordStore  │  patients.json: { id: {name, city, age, ...} }
//!  └──────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Derived fields are never stored.** `bmi` and `verdict` are recomputed
//! from height and weight every time a record is materialized.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, PatientUpdate, Verdict, sort keys)
//! - [`store`]: Whole-file JSON persistence
//! - [`registry`]: Load/mutate/save coordinator

pub mod models;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use models::{
    Gender, NewPatient, Patient, PatientBody, PatientFields, PatientUpdate, PatientView, SortError,
    SortField, SortOrder, ValidationError, Verdict,
};
pub use registry::{PatientRegistry, RegistryError, RegistryResult};
pub use store::{Collection, RecordStore, StoreError, StoreResult};
