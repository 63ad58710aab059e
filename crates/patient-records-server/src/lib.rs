//! HTTP surface for the patient records service.
//!
//! Maps requests onto [`patient_records_core::RecordService`] calls and
//! service errors onto status codes.
//!
//! # Modules
//!
//! - [`api`]: axum router, handlers and error mapping
//! - [`config`]: TOML configuration with command-line overrides
//! - [`logging`]: tracing subscriber setup

pub mod api;
pub mod config;
pub mod logging;

pub use api::{router, serve, AppState};
pub use config::{ConfigError, ServerConfig};
