//! Derived health metrics.

use std::fmt;

use serde::Serialize;

/// Lower bound of the "Normal weight" band.
pub const NORMAL_BMI_MIN: f64 = 18.5;
/// Lower bound of the "Overweight" band.
pub const OVERWEIGHT_BMI_MIN: f64 = 25.0;
/// Lower bound of the "Obesity" band.
pub const OBESE_BMI_MIN: f64 = 29.9;

/// Body-mass index from height (cm) and weight (kg), rounded to two decimals.
///
/// Rounding is half-to-even on the exact binary value, so `78.125` becomes
/// `78.12`. Returns 0.0 when height is not positive.
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    round_cents(bmi)
}

// `{:.2}` rounds the exact value; scaling by 100 first would round twice
fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Qualitative weight category derived from BMI.
///
/// Bands are half-open and contiguous: `[0, 18.5)`, `[18.5, 25)`,
/// `[25, 29.9)`, `[29.9, ∞)`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Verdict {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obesity,
}

impl Verdict {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < NORMAL_BMI_MIN {
            Verdict::Underweight
        } else if bmi < OVERWEIGHT_BMI_MIN {
            Verdict::NormalWeight
        } else if bmi < OBESE_BMI_MIN {
            Verdict::Overweight
        } else {
            Verdict::Obesity
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::NormalWeight => "Normal weight",
            Verdict::Overweight => "Overweight",
            Verdict::Obesity => "Obesity",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
