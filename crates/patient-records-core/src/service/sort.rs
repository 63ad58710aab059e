//! Sort keys and ordering for patient listings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::ServiceError;
use crate::models::PatientView;

/// Attribute a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
    Age,
    Name,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Height,
        SortField::Weight,
        SortField::Bmi,
        SortField::Age,
        SortField::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
            SortField::Age => "age",
            SortField::Name => "name",
        }
    }

    /// Ascending comparison on this attribute.
    pub fn compare(&self, a: &PatientView, b: &PatientView) -> Ordering {
        match self {
            SortField::Height => a
                .patient
                .height
                .partial_cmp(&b.patient.height)
                .unwrap_or(Ordering::Equal),
            SortField::Weight => a
                .patient
                .weight
                .partial_cmp(&b.patient.weight)
                .unwrap_or(Ordering::Equal),
            SortField::Bmi => a.bmi.partial_cmp(&b.bmi).unwrap_or(Ordering::Equal),
            SortField::Age => a.patient.age.cmp(&b.patient.age),
            SortField::Name => a.patient.name.cmp(&b.patient.name),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                ServiceError::BadRequest(format!(
                    "Invalid sort field. Select from {}",
                    quoted_list(SortField::ALL.iter().map(SortField::as_str))
                ))
            })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Apply this direction to an ascending ordering.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                ServiceError::BadRequest(format!(
                    "Invalid order. Select from {}",
                    quoted_list(SortOrder::ALL.iter().map(SortOrder::as_str))
                ))
            })
    }
}

fn quoted_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = names.map(|n| format!("'{}'", n)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Stable sort; equal keys keep their original relative order in both
/// directions.
pub fn sort_views(views: &mut [PatientView], field: SortField, order: SortOrder) {
    views.sort_by(|a, b| order.apply(field.compare(a, b)));
}
