//! Domain models for the patient registry.

mod metrics;
mod patient;
mod sort;

pub use metrics::*;
pub use patient::*;
pub use sort::*;
