//! Patient models.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use super::field;
use super::metrics::{body_mass_index, Verdict};

/// Gender as accepted on the wire.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// All accepted values, in declaration order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL.into_iter().find(|g| g.as_str() == s).ok_or(())
    }
}

/// A validated patient record.
///
/// Instances only come out of [`crate::validation`], so every field already
/// satisfies its constraint. Derived metrics are methods, never fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Patient {
    /// Unique identifier (e.g. "P001")
    pub id: String,
    /// Full name, at most 50 characters
    pub name: String,
    /// City of residence
    pub city: String,
    /// Age in years, strictly between 0 and 120
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
}

impl Patient {
    /// Body-mass index rounded to two decimals.
    pub fn bmi(&self) -> f64 {
        body_mass_index(self.height, self.weight)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_bmi(self.bmi())
    }

    /// Raw field mapping as persisted: no `id`, no derived fields.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert(field::NAME.into(), Value::from(self.name.as_str()));
        raw.insert(field::CITY.into(), Value::from(self.city.as_str()));
        raw.insert(field::AGE.into(), Value::from(self.age));
        raw.insert(field::GENDER.into(), Value::from(self.gender.as_str()));
        raw.insert(field::HEIGHT.into(), Value::from(self.height));
        raw.insert(field::WEIGHT.into(), Value::from(self.weight));
        raw
    }

    /// Attach the derived metrics for a response.
    pub fn into_view(self) -> PatientView {
        let bmi = self.bmi();
        PatientView {
            verdict: Verdict::from_bmi(bmi),
            bmi,
            patient: self,
        }
    }
}

/// A patient together with its derived metrics, as returned to callers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PatientView {
    #[serde(flatten)]
    pub patient: Patient,
    pub bmi: f64,
    pub verdict: Verdict,
}
