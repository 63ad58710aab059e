//! Record service: CRUD and sort over the persisted collection.
//!
//! Every operation is one load → validate → mutate → save cycle against the
//! store. Nothing is cached between calls.

mod sort;

pub use sort::*;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{field, Patient, PatientView};
use crate::store::{JsonStore, StoreError};
use crate::validation::{self, ValidationError};

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Carries the id; the message itself is fixed.
    #[error("Patient not found")]
    NotFound(String),

    #[error("Patient with this ID already exists")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Stored record {id} is invalid: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// CRUD operations over a [`JsonStore`].
#[derive(Debug, Clone)]
pub struct RecordService {
    store: JsonStore,
}

impl RecordService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Validate and insert a new record. `input` must carry an `id`.
    pub fn create(&self, input: &Value) -> ServiceResult<PatientView> {
        let mut collection = self.store.load();

        if let Some(id) = input.get(field::ID).and_then(Value::as_str) {
            if collection.contains_key(id) {
                return Err(ServiceError::Conflict(id.to_string()));
            }
        }

        let patient = validation::validate_patient_value(input)?;
        collection.insert(patient.id.clone(), Value::Object(patient.to_raw()));
        self.store.save(&collection)?;

        info!(patient_id = %patient.id, "patient created");
        Ok(patient.into_view())
    }

    /// Fetch one record with its derived metrics.
    pub fn get(&self, id: &str) -> ServiceResult<PatientView> {
        let collection = self.store.load();
        let raw = collection
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        Ok(hydrate(id, raw)?.into_view())
    }

    /// Every record, in stored order.
    pub fn list(&self) -> ServiceResult<Vec<PatientView>> {
        let collection = self.store.load();
        collection
            .iter()
            .map(|(id, raw)| hydrate(id, raw).map(Patient::into_view))
            .collect()
    }

    /// Sort by a field name and optional direction, as given by a caller.
    ///
    /// `order` defaults to ascending.
    pub fn sort(&self, field: &str, order: Option<&str>) -> ServiceResult<Vec<PatientView>> {
        let field: SortField = field.parse()?;
        let order = match order {
            Some(order) => order.parse()?,
            None => SortOrder::default(),
        };
        self.sorted(field, order)
    }

    /// Every record, sorted.
    pub fn sorted(&self, field: SortField, order: SortOrder) -> ServiceResult<Vec<PatientView>> {
        let mut views = self.list()?;
        sort_views(&mut views, field, order);
        debug!(%field, %order, count = views.len(), "patients sorted");
        Ok(views)
    }

    /// Apply a partial update and re-validate the merged record.
    pub fn update(&self, id: &str, input: &Value) -> ServiceResult<PatientView> {
        let mut collection = self.store.load();
        let existing = collection
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        let patch = validation::validate_patch_value(input)?;

        let mut merged = match existing {
            Value::Object(raw) => raw.clone(),
            _ => Map::new(),
        };
        patch.apply_to(&mut merged);
        merged.insert(field::ID.into(), Value::from(id));

        let patient = validation::validate_patient(&merged)?;
        collection.insert(id.to_string(), Value::Object(patient.to_raw()));
        self.store.save(&collection)?;

        info!(patient_id = %id, fields = ?patch.set_fields(), "patient updated");
        Ok(patient.into_view())
    }

    /// Remove a record.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut collection = self.store.load();
        if collection.shift_remove(id).is_none() {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        self.store.save(&collection)?;

        info!(patient_id = %id, "patient deleted");
        Ok(())
    }
}

/// Re-attach the id to a stored raw record and validate it.
fn hydrate(id: &str, raw: &Value) -> ServiceResult<Patient> {
    let result = match raw {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            fields.insert(field::ID.into(), Value::from(id));
            validation::validate_patient(&fields)
        }
        other => validation::validate_patient_value(other),
    };
    result.map_err(|source| ServiceError::CorruptRecord {
        id: id.to_string(),
        source,
    })
}
