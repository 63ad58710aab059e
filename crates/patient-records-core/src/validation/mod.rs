//! Schema validation for patient records and partial updates.
//!
//! Input is a raw JSON mapping. Every field check runs, in field order, and all
//! violations are reported together. Derived metrics are never computed for
//! input that fails here.

mod rules;

pub use rules::{AGE_EXCLUSIVE_MAX, AGE_EXCLUSIVE_MIN, NAME_MAX_CHARS};

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{field, Patient, PatientPatch};
use rules::Collector;

/// Pseudo-field used when the input is not a JSON object at all.
pub const ROOT_FIELD: &str = "__root__";

/// Category of a failed constraint.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    TypeMismatch,
    Range,
    Enum,
    Length,
}

/// One failed constraint on one field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every constraint a record failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid patient record: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Violations reported against a single field.
    pub fn for_field<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldViolation> {
        self.violations.iter().filter(move |v| v.field == name)
    }

    fn not_an_object(value: &Value) -> Self {
        Self {
            violations: vec![FieldViolation::new(
                ROOT_FIELD,
                ViolationKind::TypeMismatch,
                format!("expected an object, got {}", rules::json_type(value)),
            )],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Build a [`Patient`] from a raw mapping that includes `id`.
///
/// Keys outside the schema (including stale `bmi`/`verdict`) are ignored.
pub fn validate_patient(raw: &Map<String, Value>) -> ValidationResult<Patient> {
    let mut c = Collector::default();

    let id = c.required(raw, field::ID, rules::string);
    let name = c.required(raw, field::NAME, rules::name);
    let city = c.required(raw, field::CITY, rules::string);
    let age = c.required(raw, field::AGE, rules::age);
    let gender = c.required(raw, field::GENDER, rules::gender);
    let height = c.required(raw, field::HEIGHT, rules::positive);
    let weight = c.required(raw, field::WEIGHT, rules::positive);

    match (id, name, city, age, gender, height, weight) {
        (Some(id), Some(name), Some(city), Some(age), Some(gender), Some(height), Some(weight))
            if c.is_clean() =>
        {
            Ok(Patient {
                id,
                name,
                city,
                age,
                gender,
                height,
                weight,
            })
        }
        _ => Err(c.into_error()),
    }
}

/// Like [`validate_patient`], for input not yet known to be an object.
pub fn validate_patient_value(value: &Value) -> ValidationResult<Patient> {
    match value {
        Value::Object(raw) => validate_patient(raw),
        other => Err(ValidationError::not_an_object(other)),
    }
}

/// Build a [`PatientPatch`] from a raw mapping where every field is optional.
///
/// `id` is not patchable and is ignored.
pub fn validate_patch(raw: &Map<String, Value>) -> ValidationResult<PatientPatch> {
    let mut c = Collector::default();

    let patch = PatientPatch {
        name: c.optional(raw, field::NAME, rules::name),
        city: c.optional(raw, field::CITY, rules::string),
        age: c.optional(raw, field::AGE, rules::age),
        gender: c.optional(raw, field::GENDER, rules::gender),
        height: c.optional(raw, field::HEIGHT, rules::positive),
        weight: c.optional(raw, field::WEIGHT, rules::positive),
    };

    if c.is_clean() {
        Ok(patch)
    } else {
        Err(c.into_error())
    }
}

/// Like [`validate_patch`], for input not yet known to be an object.
pub fn validate_patch_value(value: &Value) -> ValidationResult<PatientPatch> {
    match value {
        Value::Object(raw) => validate_patch(raw),
        other => Err(ValidationError::not_an_object(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "id": "P001",
            "name": "Ananya Verma",
            "city": "Guwahati",
            "age": 28,
            "gender": "female",
            "height": 165.0,
            "weight": 90.0
        })
    }

    #[test]
    fn test_valid_record() {
        let patient = validate_patient_value(&valid()).unwrap();
        assert_eq!(patient.id, "P001");
        assert_eq!(patient.age, 28);
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.height, 165.0);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut input = valid();
        input["bmi"] = json!(1.0);
        input["verdict"] = json!("Underweight");
        input["nickname"] = json!("Anu");

        let patient = validate_patient_value(&input).unwrap();
        assert_eq!(patient.bmi(), 33.06);
        assert!(!patient.to_raw().contains_key("nickname"));
    }

    #[test]
    fn test_numeric_strings_become_numbers() {
        let mut input = valid();
        input["age"] = json!("30");
        input["height"] = json!("170");

        let patient = validate_patient_value(&input).unwrap();
        assert_eq!(patient.age, 30);
        assert_eq!(patient.height, 170.0);
        assert_eq!(patient.to_raw()["age"], json!(30));

        input["age"] = json!("thirty");
        let err = validate_patient_value(&input).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "age");
        assert_eq!(err.violations[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_collects_every_violation() {
        let input = json!({
            "name": "x".repeat(60),
            "city": 7,
            "age": 0,
            "gender": "robot",
            "height": -1,
            "weight": null
        });

        let err = validate_patient_value(&input).unwrap_err();
        let kinds: Vec<_> = err.violations.iter().map(|v| (v.field.as_str(), v.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("id", ViolationKind::Missing),
                ("name", ViolationKind::Length),
                ("city", ViolationKind::TypeMismatch),
                ("age", ViolationKind::Range),
                ("gender", ViolationKind::Enum),
                ("height", ViolationKind::Range),
                ("weight", ViolationKind::TypeMismatch),
            ]
        );
    }

    #[test]
    fn test_non_object_input() {
        let err = validate_patient_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, ROOT_FIELD);
        assert_eq!(err.violations[0].message, "expected an object, got array");
    }

    #[test]
    fn test_error_display_lists_fields() {
        let err = validate_patient_value(&json!({})).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("invalid patient record: id: field required"));
        assert!(text.contains("weight: field required"));
        assert_eq!(err.for_field("age").count(), 1);
    }

    #[test]
    fn test_patch_all_absent() {
        let patch = validate_patch_value(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_partial() {
        let patch = validate_patch_value(&json!({"age": 45, "gender": "male"})).unwrap();
        assert_eq!(patch.age, Some(45));
        assert_eq!(patch.gender, Some(Gender::Male));
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_patch_ignores_id() {
        let patch = validate_patch_value(&json!({"id": "P999"})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_rejects_null_and_bad_values() {
        let err = validate_patch_value(&json!({"city": null, "height": 0})).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert_eq!(err.violations[0].field, "city");
        assert_eq!(err.violations[0].kind, ViolationKind::TypeMismatch);
        assert_eq!(err.violations[1].kind, ViolationKind::Range);
    }

    #[test]
    fn test_violation_serializes_snake_case() {
        let v = FieldViolation::new("age", ViolationKind::TypeMismatch, "expected an integer, got string");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "type_mismatch");
        assert_eq!(json["field"], "age");
    }
}
