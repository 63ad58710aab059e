//! Domain models for the patient records system.

mod metrics;
mod patch;
mod patient;

pub use metrics::*;
pub use patch::*;
pub use patient::*;

/// Wire names of every patient field.
pub mod field {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const CITY: &str = "city";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const HEIGHT: &str = "height";
    pub const WEIGHT: &str = "weight";
    pub const BMI: &str = "bmi";
    pub const VERDICT: &str = "verdict";
}
