//! Patient Records Core Library
//!
//! Flat-file patient registry with declarative field validation and derived
//! health metrics.
//!
//! # Architecture
//!
//! ```text
//!   request ──▶ RecordService ──▶ JsonStore::load ──▶ raw mapping (id → fields)
//!                    │                                      │
//!                    │                              ┌───────▼────────┐
//!                    │                              │   validation   │
//!                    │                              │  typed Patient │
//!                    │                              └───────┬────────┘
//!                    │                                      │
//!                    │                         bmi / verdict derived on read
//!                    │                                      │
//!                    └──── mutation ──▶ JsonStore::save (whole document)
//! ```
//!
//! # Core Principle
//!
//! **Derived fields are never stored.** Only raw fields reach the data file;
//! `bmi` and `verdict` are recomputed every time a record is read.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Gender, Verdict, PatientPatch)
//! - [`validation`]: Field constraints for full records and partial updates
//! - [`store`]: Whole-document JSON persistence
//! - [`service`]: CRUD and sort operations

pub mod models;
pub mod service;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use models::{Gender, Patient, PatientPatch, PatientView, Verdict};
pub use service::{RecordService, ServiceError, ServiceResult, SortField, SortOrder};
pub use store::{Collection, JsonStore, StoreError, StoreResult};
pub use validation::{FieldViolation, ValidationError, ViolationKind};
