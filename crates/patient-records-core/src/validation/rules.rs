//! Per-field constraint checks.

use serde_json::{Map, Value};

use super::{FieldViolation, ValidationError, ViolationKind};
use crate::models::Gender;

/// Maximum length of `name`, in characters.
pub const NAME_MAX_CHARS: usize = 50;
/// Exclusive lower bound for `age`.
pub const AGE_EXCLUSIVE_MIN: i64 = 0;
/// Exclusive upper bound for `age`.
pub const AGE_EXCLUSIVE_MAX: i64 = 120;

/// A check turns one JSON value into a typed field value.
pub(crate) type Check<T> = fn(&str, &Value) -> Result<T, FieldViolation>;

/// Whether a key was left out, sent as `null`, or sent with a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Presence<'a> {
    Absent,
    Null,
    Given(&'a Value),
}

impl<'a> Presence<'a> {
    pub(crate) fn of(raw: &'a Map<String, Value>, field: &str) -> Self {
        match raw.get(field) {
            None => Presence::Absent,
            Some(Value::Null) => Presence::Null,
            Some(value) => Presence::Given(value),
        }
    }
}

/// Runs checks in sequence and accumulates every violation.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    violations: Vec<FieldViolation>,
}

impl Collector {
    /// A field every full record must carry.
    pub(crate) fn required<T>(
        &mut self,
        raw: &Map<String, Value>,
        field: &str,
        check: Check<T>,
    ) -> Option<T> {
        match Presence::of(raw, field) {
            Presence::Absent => {
                self.push(FieldViolation::new(field, ViolationKind::Missing, "field required"));
                None
            }
            Presence::Null => {
                self.push(null_violation(field));
                None
            }
            Presence::Given(value) => self.run(field, value, check),
        }
    }

    /// A field a patch may leave out. Explicit null is still rejected because
    /// no patient field can be cleared.
    pub(crate) fn optional<T>(
        &mut self,
        raw: &Map<String, Value>,
        field: &str,
        check: Check<T>,
    ) -> Option<T> {
        match Presence::of(raw, field) {
            Presence::Absent => None,
            Presence::Null => {
                self.push(null_violation(field));
                None
            }
            Presence::Given(value) => self.run(field, value, check),
        }
    }

    pub(crate) fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn run<T>(&mut self, field: &str, value: &Value, check: Check<T>) -> Option<T> {
        match check(field, value) {
            Ok(v) => Some(v),
            Err(violation) => {
                self.push(violation);
                None
            }
        }
    }

    fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }
}

fn null_violation(field: &str) -> FieldViolation {
    FieldViolation::new(
        field,
        ViolationKind::TypeMismatch,
        "value may not be null",
    )
}

/// JSON type name used in messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(field: &str, expected: &str, value: &Value) -> FieldViolation {
    FieldViolation::new(
        field,
        ViolationKind::TypeMismatch,
        format!("expected {}, got {}", expected, json_type(value)),
    )
}

pub(crate) fn string(field: &str, value: &Value) -> Result<String, FieldViolation> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| type_mismatch(field, "a string", value))
}

pub(crate) fn name(field: &str, value: &Value) -> Result<String, FieldViolation> {
    let name = string(field, value)?;
    let chars = name.chars().count();
    if chars > NAME_MAX_CHARS {
        return Err(FieldViolation::new(
            field,
            ViolationKind::Length,
            format!("must be at most {} characters, got {}", NAME_MAX_CHARS, chars),
        ));
    }
    Ok(name)
}

pub(crate) fn age(field: &str, value: &Value) -> Result<u32, FieldViolation> {
    let years = integer(field, value)?;
    if years <= AGE_EXCLUSIVE_MIN || years >= AGE_EXCLUSIVE_MAX {
        return Err(FieldViolation::new(
            field,
            ViolationKind::Range,
            format!(
                "must be greater than {} and less than {}, got {}",
                AGE_EXCLUSIVE_MIN, AGE_EXCLUSIVE_MAX, years
            ),
        ));
    }
    u32::try_from(years).map_err(|_| type_mismatch(field, "an integer", value))
}

pub(crate) fn gender(field: &str, value: &Value) -> Result<Gender, FieldViolation> {
    let raw = value
        .as_str()
        .ok_or_else(|| type_mismatch(field, "a string", value))?;
    raw.parse::<Gender>().map_err(|_| {
        let allowed = Gender::ALL
            .iter()
            .map(|g| format!("'{}'", g))
            .collect::<Vec<_>>()
            .join(", ");
        FieldViolation::new(
            field,
            ViolationKind::Enum,
            format!("must be one of {}, got '{}'", allowed, raw),
        )
    })
}

pub(crate) fn positive(field: &str, value: &Value) -> Result<f64, FieldViolation> {
    let number = value
        .as_f64()
        .or_else(|| numeric_str(value))
        .ok_or_else(|| type_mismatch(field, "a number", value))?;
    if !number.is_finite() || number <= 0.0 {
        return Err(FieldViolation::new(
            field,
            ViolationKind::Range,
            format!("must be greater than 0, got {}", number),
        ));
    }
    Ok(number)
}

/// Integers, or floats and numeric strings with no fractional part.
fn integer(field: &str, value: &Value) -> Result<i64, FieldViolation> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    if let Some(n) = value.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
        return Ok(n);
    }
    // `as` saturates, so out-of-range whole numbers still fail the bounds check
    match value.as_f64().or_else(|| numeric_str(value)) {
        Some(f) if f.fract() == 0.0 => Ok(f as i64),
        _ => Err(type_mismatch(field, "an integer", value)),
    }
}

/// A JSON string holding a finite decimal number, e.g. `"170"` or `" 72.5 "`.
fn numeric_str(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
