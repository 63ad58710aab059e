//! HTTP routes for the patient records service.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/` | 200 welcome message |
//! | GET | `/about` | 200 description |
//! | GET | `/view` | 200 mapping id → patient |
//! | GET | `/patient/{id}` | 200 patient |
//! | GET | `/sort?sort_by=&order=` | 200 list of patients |
//! | POST | `/create` | 201 message + patient |
//! | PUT | `/update/{id}` | 200 message + patient |
//! | DELETE | `/delete/{id}` | 200 message |

mod error;

pub use error::ApiError;

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use patient_records_core::{PatientView, RecordService, ServiceError, ServiceResult};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

pub const WELCOME_MESSAGE: &str = "Patient management system API";
pub const ABOUT_MESSAGE: &str = "A fully functional API to manage patient records";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: RecordService,
}

impl AppState {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }

    /// Run a service call on the blocking pool.
    async fn call<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&RecordService) -> ServiceResult<T> + Send + 'static,
    {
        let service = self.service.clone();
        let result = tokio::task::spawn_blocking(move || op(&service)).await?;
        Ok(result?)
    }
}

/// Build the application router.
pub fn router(service: RecordService) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/about", get(about))
        .route("/view", get(view_all))
        .route("/patient/{id}", get(view_patient))
        .route("/sort", get(sort_patients))
        .route("/create", post(create_patient))
        .route("/update/{id}", put(update_patient))
        .route("/delete/{id}", delete(delete_patient))
        .with_state(AppState::new(service))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, app: Router, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// `{"message": ..., "patient": ...}` response body.
#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    patient: Option<PatientView>,
}

impl MessageResponse {
    fn new(message: &'static str) -> Self {
        Self {
            message,
            patient: None,
        }
    }

    fn with_patient(message: &'static str, patient: PatientView) -> Self {
        Self {
            message,
            patient: Some(patient),
        }
    }
}

/// Patients serialized as a JSON object keyed by id, in list order.
#[derive(Debug)]
struct ById(Vec<PatientView>);

impl Serialize for ById {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for view in &self.0 {
            map.serialize_entry(&view.patient.id, view)?;
        }
        map.end()
    }
}

#[derive(Debug, Deserialize)]
struct SortParams {
    sort_by: Option<String>,
    order: Option<String>,
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new(WELCOME_MESSAGE))
}

async fn about() -> Json<MessageResponse> {
    Json(MessageResponse::new(ABOUT_MESSAGE))
}

async fn view_all(State(state): State<AppState>) -> Result<Json<ById>, ApiError> {
    let views = state.call(|service| service.list()).await?;
    Ok(Json(ById(views)))
}

async fn view_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientView>, ApiError> {
    let view = state.call(move |service| service.get(&id)).await?;
    Ok(Json(view))
}

async fn sort_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<PatientView>>, ApiError> {
    let sort_by = params.sort_by.ok_or_else(|| {
        ServiceError::BadRequest("Missing query parameter: sort_by".to_string())
    })?;
    let order = params.order;
    let views = state
        .call(move |service| service.sort(&sort_by, order.as_deref()))
        .await?;
    Ok(Json(views))
}

async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let input = json_body(body)?;
    let view = state.call(move |service| service.create(&input)).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_patient("Patient created successfully", view)),
    ))
}

async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let input = json_body(body)?;
    let view = state
        .call(move |service| service.update(&id, &input))
        .await?;
    Ok(Json(MessageResponse::with_patient(
        "Patient updated successfully",
        view,
    )))
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.call(move |service| service.delete(&id)).await?;
    Ok(Json(MessageResponse::new("Patient deleted successfully")))
}

#[cfg(test)]
mod tests;
