//! Partial-update models.

use serde_json::{Map, Value};

use super::field;
use super::patient::Gender;

/// A validated partial update.
///
/// `None` means the caller did not supply the field; it must never overwrite
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.set_fields().is_empty()
    }

    /// Names of the supplied fields.
    pub fn set_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push(field::NAME);
        }
        if self.city.is_some() {
            fields.push(field::CITY);
        }
        if self.age.is_some() {
            fields.push(field::AGE);
        }
        if self.gender.is_some() {
            fields.push(field::GENDER);
        }
        if self.height.is_some() {
            fields.push(field::HEIGHT);
        }
        if self.weight.is_some() {
            fields.push(field::WEIGHT);
        }
        fields
    }

    /// Overwrite the supplied fields in a raw record, leaving the rest alone.
    pub fn apply_to(&self, raw: &mut Map<String, Value>) {
        if let Some(name) = &self.name {
            raw.insert(field::NAME.into(), Value::from(name.as_str()));
        }
        if let Some(city) = &self.city {
            raw.insert(field::CITY.into(), Value::from(city.as_str()));
        }
        if let Some(age) = self.age {
            raw.insert(field::AGE.into(), Value::from(age));
        }
        if let Some(gender) = self.gender {
            raw.insert(field::GENDER.into(), Value::from(gender.as_str()));
        }
        if let Some(height) = self.height {
            raw.insert(field::HEIGHT.into(), Value::from(height));
        }
        if let Some(weight) = self.weight {
            raw.insert(field::WEIGHT.into(), Value::from(weight));
        }
    }
}
