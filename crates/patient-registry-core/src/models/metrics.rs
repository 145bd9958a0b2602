//! Derived health metrics.

use serde::Serialize;

/// Upper bound (exclusive) of the underweight band.
pub const UNDERWEIGHT_BELOW: f64 = 18.5;
/// Upper bound (exclusive) of the normal band.
pub const NORMAL_BELOW: f64 = 25.0;
/// Upper bound (exclusive) of the overweight band. Intentionally 29.9, not 30.
pub const OVERWEIGHT_BELOW: f64 = 29.9;

/// `weight / height^2`, rounded to two decimals.
pub fn body_mass_index(height_m: f64, weight_kg: f64) -> f64 {
    round2(weight_kg / (height_m * height_m))
}

/// Round to the nearest hundredth of the exact binary value.
///
/// Scaling by 100 first (`(v * 100.0).round()`) can carry a value such as
/// 29.894999.. across the .5 boundary, so the rounding goes through the exact
/// decimal expansion that `{:.2}` produces instead.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Qualitative BMI classification.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Verdict {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obesity,
}

impl Verdict {
    /// Classify a BMI value. Bands are checked in ascending order.
    pub fn classify(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            Verdict::Underweight
        } else if bmi < NORMAL_BELOW {
            Verdict::NormalWeight
        } else if bmi < OVERWEIGHT_BELOW {
            Verdict::Overweight
        } else {
            Verdict::Obesity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::NormalWeight => "Normal weight",
            Verdict::Overweight => "Overweight",
            Verdict::Obesity => "Obesity",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
