use alloc_greedy::GreedyAllocator;
use api::{
    app,
    config::ApiConfig,
    state::{AppState, Dispatch},
};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use rand_chacha::ChaCha8Rng;
use sched_core::{fixtures::school, Allocator, Catalog, Demand, ScheduleError, Timetable};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use types::*;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn loaded() -> Router {
    let app = app(AppState::new(ApiConfig::default()));
    let (status, _) = call(&app, Method::PUT, "/v1/snapshot", Some(json!(school()))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    app
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(AppState::new_default());
    let (status, body) = call(&app, Method::GET, "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn invalid_snapshot_is_rejected_with_messages() {
    let app = app(AppState::new_default());
    let mut snap = school();
    snap.qualifications.push(Qualification { teacher_id: TeacherId(9), subject_id: SubjectId(1) });

    let (status, body) = call(&app, Method::PUT, "/v1/snapshot", Some(json!(snap))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["details"].as_array().unwrap().is_empty());

    let (status, report) = call(&app, Method::POST, "/v1/validate", Some(json!(snap))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["ok"], json!(false));

    let (_, current) = call(&app, Method::GET, "/v1/snapshot", None).await;
    assert_eq!(current["teachers"], json!([]));
}

#[tokio::test]
async fn generate_with_empty_body_uses_defaults() {
    let app = loaded().await;
    let (status, res) = call(&app, Method::POST, "/v1/schedule/generate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["status"], json!("complete"));
    assert_eq!(res["allocator"], json!("greedy"));
    assert_eq!(res["stats"], json!({"placed": 32, "needed": 32}));

    let (_, again) = call(&app, Method::POST, "/v1/schedule/generate", Some(json!({"seed": 42}))).await;
    assert_eq!(again, res);
}

#[tokio::test]
async fn malformed_generate_body_is_a_bad_request() {
    let app = loaded().await;
    let (status, _) = call(&app, Method::POST, "/v1/schedule/generate", Some(json!({"seed": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn schedule_view_filters_by_class() {
    let app = loaded().await;
    call(&app, Method::POST, "/v1/schedule/generate", None).await;

    let (status, all) = call(&app, Method::GET, "/v1/schedule", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, one) = call(&app, Method::GET, "/v1/schedule?class_id=2", None).await;
    let one = one.as_array().unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0]["class"], json!("Grade 8 - B"));
    assert_eq!(one[0]["entries"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn override_maps_errors_to_status_codes() {
    let app = loaded().await;
    call(&app, Method::POST, "/v1/schedule/generate", None).await;

    // Monday P1 is Subject 1 with Teacher 1 for class 1.
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/schedule/override",
        Some(json!({"class_id": 2, "day": 0, "slot": 0, "subject_id": 1, "teacher_id": 1, "room_id": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("teacher 1"));

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/schedule/override",
        Some(json!({"class_id": 2, "day": 6, "slot": 0, "subject_id": 1, "teacher_id": 1, "room_id": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/schedule/override",
        Some(json!({"class_id": 2, "day": 0, "slot": 0, "subject_id": 1, "teacher_id": 1, "room_id": 77})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clear_then_override_into_empty_cell() {
    let app = loaded().await;
    call(&app, Method::POST, "/v1/schedule/generate", None).await;

    let (_, cleared) = call(&app, Method::POST, "/v1/schedule/clear", None).await;
    assert_eq!(cleared, json!({"cleared": 32}));

    let (status, a) = call(
        &app,
        Method::POST,
        "/v1/schedule/override",
        Some(json!({"class_id": 1, "day": 2, "slot": 3, "subject_id": 3, "teacher_id": 3, "room_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(a["timeslot_id"], json!(16));
}

#[tokio::test]
async fn audit_reports_double_booking() {
    let app = app(AppState::new_default());
    let clash = json!({"class_id": 1, "timeslot_id": 1, "subject_id": 1, "teacher_id": 1, "room_id": 1});
    let mut other = clash.clone();
    other["class_id"] = json!(2);
    other["room_id"] = json!(2);

    let (status, out) = call(
        &app,
        Method::POST,
        "/v1/audit",
        Some(json!({"snapshot": school(), "assignments": [clash, other]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["ok"], json!(false));
    assert_eq!(out["violations"][0]["type"], json!("teacher_double_booked"));
}

/// Greedy sweep that first sits on the blocking thread for a while.
struct Sluggish(GreedyAllocator);

impl Allocator for Sluggish {
    fn name(&self) -> &'static str {
        "sluggish"
    }

    fn allocate(
        &self,
        catalog: &Catalog<'_>,
        demand: &mut Demand,
        rng: &mut ChaCha8Rng,
    ) -> Result<Timetable, ScheduleError> {
        std::thread::sleep(Duration::from_millis(300));
        self.0.allocate(catalog, demand, rng)
    }
}

#[tokio::test]
async fn timed_out_generate_is_503_but_still_commits() {
    let mut config = ApiConfig::default();
    config.solver.timeout_secs = 0;
    let slow: Arc<dyn Allocator> = Arc::new(Sluggish(GreedyAllocator::new()));
    let state = AppState {
        allocators: Dispatch::from_parts(slow.clone(), slow),
        ..AppState::new(config)
    };
    state.store.load(school()).unwrap();
    let app = app(state.clone());

    let (status, body) = call(&app, Method::POST, "/v1/schedule/generate", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("did not finish"));

    let mut committed = 0;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        committed = state.store.assignments().len();
        if committed > 0 {
            break;
        }
    }
    assert_eq!(committed, 32);
}
