use super::*;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::protocol::PredictRequest;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn spawn_service(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn unreachable_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn record_and_classify(
    State(recorded): State<Recorded>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.requests.lock().expect("requests").push(body.clone());
    let temperature = body["temperature"].as_f64().unwrap_or_default();
    let pressure = body["pressure"].as_f64().unwrap_or_default();
    let golden = temperature > 180.0 && pressure < 30.0;
    Json(json!({
        "input": { "temperature": temperature, "pressure": pressure },
        "prediction": if golden { "High Quality" } else { "Defective" },
        "is_golden_batch": golden,
    }))
}

fn request(temperature: f64, pressure: f64) -> PredictRequest {
    PredictRequest {
        temperature,
        pressure,
    }
}

#[tokio::test]
async fn posts_snapshot_and_maps_golden_response() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/predict", post(record_and_classify))
        .with_state(recorded.clone());
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let result = service.predict(&request(190.0, 25.0)).await.expect("predict");

    assert_eq!(
        result,
        PredictionResult {
            label: "High Quality".into(),
            is_golden: true
        }
    );
    let requests = recorded.requests.lock().expect("requests").clone();
    assert_eq!(requests, vec![json!({ "temperature": 190.0, "pressure": 25.0 })]);
}

#[tokio::test]
async fn maps_defect_response() {
    let app = Router::new()
        .route("/predict", post(record_and_classify))
        .with_state(Recorded::default());
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(format!("{url}/"), TEST_TIMEOUT).expect("client");

    let result = service.predict(&request(120.0, 45.0)).await.expect("predict");

    assert_eq!(result.label, "Defective");
    assert!(!result.is_golden);
}

#[tokio::test]
async fn error_status_is_service_unavailable_with_detail() {
    let app = Router::new().route(
        "/predict",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Model not loaded" })),
            )
        }),
    );
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let err = service
        .predict(&request(150.0, 30.0))
        .await
        .expect_err("must fail");

    assert!(matches!(err, PredictionError::ServiceUnavailable { .. }));
    assert!(err.reason().contains("500"), "{err}");
    assert!(err.reason().contains("Model not loaded"), "{err}");
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let app = Router::new().route("/predict", post(|| async { "Passed" }));
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let err = service
        .predict(&request(150.0, 30.0))
        .await
        .expect_err("must fail");

    assert!(matches!(err, PredictionError::InvalidResponse { .. }), "{err}");
}

#[tokio::test]
async fn missing_golden_flag_is_invalid_response() {
    let app = Router::new().route(
        "/predict",
        post(|| async { Json(json!({ "prediction": "Pass" })) }),
    );
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let err = service
        .predict(&request(150.0, 30.0))
        .await
        .expect_err("must fail");

    assert!(matches!(err, PredictionError::InvalidResponse { .. }), "{err}");
    assert!(err.reason().contains("is_golden_batch"), "{err}");
}

#[tokio::test]
async fn slow_service_times_out_as_unavailable() {
    let app = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(800)).await;
            Json(json!({ "prediction": "Pass", "is_golden_batch": true }))
        }),
    );
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, Duration::from_millis(100)).expect("client");

    let err = service
        .predict(&request(150.0, 30.0))
        .await
        .expect_err("must time out");

    assert!(matches!(err, PredictionError::ServiceUnavailable { .. }), "{err}");
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let url = unreachable_url().await.expect("free port");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let err = service
        .predict(&request(150.0, 30.0))
        .await
        .expect_err("must fail");

    assert!(matches!(err, PredictionError::ServiceUnavailable { .. }), "{err}");
}

#[tokio::test]
async fn health_probe_reads_status() {
    let app = Router::new().route(
        "/",
        get(|| async {
            Json(json!({
                "status": "online",
                "message": "Golden Batch API is running. POST to /predict to use."
            }))
        }),
    );
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let health = service.check_health().await.expect("health");

    assert!(health.is_online());
    assert!(health.message.is_some());
}

#[tokio::test]
async fn health_probe_against_missing_route_fails() {
    let app = Router::new().route("/predict", post(record_and_classify)).with_state(Recorded::default());
    let url = spawn_service(app).await.expect("spawn service");
    let service = HttpPredictionService::new(url, TEST_TIMEOUT).expect("client");

    let err = service.check_health().await.expect_err("404 must fail");

    assert!(err.reason().contains("404"), "{err}");
}
