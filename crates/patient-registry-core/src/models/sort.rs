//! Sort keys for listing patients.

use std::str::FromStr;

use thiserror::Error;

use super::Patient;

/// Invalid sort parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Invalid sort field '{0}'. Valid fields are height, weight, bmi")]
    InvalidField(String),

    #[error("Invalid order '{0}'. Valid orders are asc and desc")]
    InvalidOrder(String),
}

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }

    /// Extract the sort key from a record.
    pub fn key(&self, patient: &Patient) -> f64 {
        match self {
            SortField::Height => patient.fields().height,
            SortField::Weight => patient.fields().weight,
            SortField::Bmi => patient.bmi(),
        }
    }
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SortError::InvalidField(s.to_string()))
    }
}

/// Direction of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(SortError::InvalidOrder(other.to_string())),
        }
    }
}

/// Stable in-place sort of records by `field` in `order`.
pub fn sort_patients(patients: &mut [Patient], field: SortField, order: SortOrder) {
    patients.sort_by(|a, b| {
        let ordering = field.key(a).total_cmp(&field.key(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
