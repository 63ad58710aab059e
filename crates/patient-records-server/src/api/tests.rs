//! Handler tests against a temp data file.

use axum::body::to_bytes;
use axum::response::{IntoResponse, Response};
use patient_records_core::JsonStore;
use serde_json::json;
use tempfile::TempDir;

use super::*;

fn setup_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let service = RecordService::new(JsonStore::open(dir.path().join("patients.json")));
    (dir, AppState::new(service))
}

fn patient(id: &str, height: f64, weight: f64) -> Value {
    json!({
        "id": id,
        "name": "Nitesh",
        "city": "Kathmandu",
        "age": 25,
        "gender": "male",
        "height": height,
        "weight": weight
    })
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(state: &AppState, input: Value) -> Response {
    create_patient(State(state.clone()), Ok(Json(input)))
        .await
        .into_response()
}

fn sort_params(sort_by: Option<&str>, order: Option<&str>) -> Query<SortParams> {
    Query(SortParams {
        sort_by: sort_by.map(str::to_string),
        order: order.map(str::to_string),
    })
}

#[tokio::test]
async fn test_welcome_and_about() {
    let body = body_json(welcome().await.into_response()).await;
    assert_eq!(body, json!({"message": "Patient management system API"}));

    let body = body_json(about().await.into_response()).await;
    assert_eq!(body["message"], ABOUT_MESSAGE);
}

#[tokio::test]
async fn test_create_returns_201_with_derived_fields() {
    let (_dir, state) = setup_state();

    let response = create(&state, patient("P001", 170.0, 70.0)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Patient created successfully");
    assert_eq!(body["patient"]["id"], "P001");
    assert_eq!(body["patient"]["bmi"], 24.22);
    assert_eq!(body["patient"]["verdict"], "Normal weight");
}

#[tokio::test]
async fn test_create_duplicate_is_400() {
    let (_dir, state) = setup_state();
    create(&state, patient("P001", 170.0, 70.0)).await;

    let response = create(&state, patient("P001", 150.0, 90.0)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({"detail": "Patient with this ID already exists"}));
}

#[tokio::test]
async fn test_create_invalid_is_422_with_field_details() {
    let (_dir, state) = setup_state();
    let mut input = patient("P001", 170.0, 70.0);
    input["gender"] = json!("unknown");
    input["age"] = json!(121);

    let response = create(&state, input).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let detail = body["detail"].as_array().unwrap();
    assert_eq!(detail.len(), 2);
    assert_eq!(detail[0]["field"], "age");
    assert_eq!(detail[0]["kind"], "range");
    assert_eq!(detail[1]["field"], "gender");
    assert_eq!(detail[1]["kind"], "enum");
}

#[tokio::test]
async fn test_view_patient_and_404() {
    let (_dir, state) = setup_state();
    create(&state, patient("P001", 150.0, 90.0)).await;

    let response = view_patient(State(state.clone()), Path("P001".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bmi"], 40.0);
    assert_eq!(body["verdict"], "Obesity");

    let response = view_patient(State(state), Path("P404".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body, json!({"detail": "Patient not found"}));
}

#[tokio::test]
async fn test_view_all_is_keyed_by_id() {
    let (_dir, state) = setup_state();
    create(&state, patient("P002", 170.0, 70.0)).await;
    create(&state, patient("P001", 150.0, 90.0)).await;

    let body = body_json(view_all(State(state)).await.into_response()).await;
    let map = body.as_object().unwrap();
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, vec!["P002", "P001"]);
    assert_eq!(map["P001"]["id"], "P001");
    assert_eq!(map["P002"]["verdict"], "Normal weight");
}

#[tokio::test]
async fn test_sort() {
    let (_dir, state) = setup_state();
    create(&state, patient("P001", 170.0, 70.0)).await;
    create(&state, patient("P002", 150.0, 90.0)).await;
    create(&state, patient("P003", 180.0, 55.0)).await;

    let response = sort_patients(State(state.clone()), sort_params(Some("bmi"), Some("desc")))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["P002", "P001", "P003"]);

    // order defaults to asc
    let body = body_json(
        sort_patients(State(state.clone()), sort_params(Some("height"), None))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(body[0]["id"], "P002");
}

#[tokio::test]
async fn test_sort_bad_params_are_400() {
    let (_dir, state) = setup_state();

    for params in [
        sort_params(Some("city"), None),
        sort_params(Some("age"), Some("sideways")),
        sort_params(None, Some("asc")),
    ] {
        let response = sort_patients(State(state.clone()), params)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_update() {
    let (_dir, state) = setup_state();
    create(&state, patient("P001", 170.0, 70.0)).await;

    let response = update_patient(
        State(state.clone()),
        Path("P001".to_string()),
        Ok(Json(json!({"height": 150, "weight": 90}))),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Patient updated successfully");
    assert_eq!(body["patient"]["name"], "Nitesh");
    assert_eq!(body["patient"]["verdict"], "Obesity");

    let response = update_patient(
        State(state.clone()),
        Path("P404".to_string()),
        Ok(Json(json!({"age": 30}))),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = update_patient(
        State(state),
        Path("P001".to_string()),
        Ok(Json(json!({"weight": -3}))),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete() {
    let (_dir, state) = setup_state();
    create(&state, patient("P001", 170.0, 70.0)).await;

    let response = delete_patient(State(state.clone()), Path("P001".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"message": "Patient deleted successfully"}));

    let response = delete_patient(State(state), Path("P001".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
