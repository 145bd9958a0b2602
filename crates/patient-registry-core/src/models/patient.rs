//! Patient models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metrics::{body_mass_index, Verdict};

/// Exclusive upper bound for `age`.
pub const MAX_AGE: i64 = 120;

/// Field-level validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("age must be greater than 0 and less than 120, got {0}")]
    AgeOutOfRange(i64),

    #[error("{field} must be greater than 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::NotPositive { field, .. } => field,
            Self::AgeOutOfRange(_) => "age",
        }
    }
}

/// Gender as accepted on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// The stored attributes of a patient, keyed by id in the collection.
///
/// This is exactly what lands in the backing file. Derived metrics are not
/// part of it; unknown keys (such as a stale `bmi`) are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientFields {
    pub name: String,
    pub city: String,
    /// Years
    pub age: i64,
    pub gender: Gender,
    /// Meters
    pub height: f64,
    /// Kilograms
    pub weight: f64,
}

impl PatientFields {
    /// Check every field constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if self.city.trim().is_empty() {
            return Err(ValidationError::Empty { field: "city" });
        }
        if self.age <= 0 || self.age >= MAX_AGE {
            return Err(ValidationError::AgeOutOfRange(self.age));
        }
        // Negated comparisons so NaN is rejected as well.
        if !(self.height > 0.0) {
            return Err(ValidationError::NotPositive {
                field: "height",
                value: self.height,
            });
        }
        if !(self.weight > 0.0) {
            return Err(ValidationError::NotPositive {
                field: "weight",
                value: self.weight,
            });
        }
        Ok(())
    }
}

/// Request body for creating a patient: the id plus every stored field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub id: String,
    #[serde(flatten)]
    pub fields: PatientFields,
}

/// A validated patient record.
///
/// Only constructible through [`Patient::new`], so holding one means the
/// fields passed validation. `bmi` and `verdict` are computed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    id: String,
    fields: PatientFields,
}

impl Patient {
    /// Validate and build a record.
    pub fn new(id: impl Into<String>, fields: PatientFields) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        fields.validate()?;
        Ok(Self { id, fields })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &PatientFields {
        &self.fields
    }

    /// Body-mass index rounded to two decimals.
    pub fn bmi(&self) -> f64 {
        body_mass_index(self.fields.height, self.fields.weight)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::classify(self.bmi())
    }

    /// Apply a partial update and re-validate the merged result.
    pub fn apply(&self, update: &PatientUpdate) -> Result<Self, ValidationError> {
        let mut fields = self.fields.clone();
        update.merge_into(&mut fields);
        Self::new(self.id.clone(), fields)
    }

    /// Stored fields plus derived metrics, without the id.
    pub fn body(&self) -> PatientBody<'_> {
        PatientBody {
            fields: &self.fields,
            bmi: self.bmi(),
            verdict: self.verdict(),
        }
    }

    /// Full representation returned by single-record endpoints.
    pub fn view(&self) -> PatientView<'_> {
        PatientView {
            id: &self.id,
            body: self.body(),
        }
    }
}

impl TryFrom<NewPatient> for Patient {
    type Error = ValidationError;

    fn try_from(new: NewPatient) -> Result<Self, Self::Error> {
        Patient::new(new.id, new.fields)
    }
}

/// Serialized record body: stored fields with `bmi` and `verdict` appended.
#[derive(Debug, Serialize)]
pub struct PatientBody<'a> {
    #[serde(flatten)]
    pub fields: &'a PatientFields,
    pub bmi: f64,
    pub verdict: Verdict,
}

/// Serialized record including its id.
#[derive(Debug, Serialize)]
pub struct PatientView<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub body: PatientBody<'a>,
}

/// Partial update payload. Absent and `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientUpdate {
    fn merge_into(&self, fields: &mut PatientFields) {
        if let Some(name) = &self.name {
            fields.name = name.clone();
        }
        if let Some(city) = &self.city {
            fields.city = city.clone();
        }
        if let Some(age) = self.age {
            fields.age = age;
        }
        if let Some(gender) = self.gender {
            fields.gender = gender;
        }
        if let Some(height) = self.height {
            fields.height = height;
        }
        if let Some(weight) = self.weight {
            fields.weight = weight;
        }
    }
}
