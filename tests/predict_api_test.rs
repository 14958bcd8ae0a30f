use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use commodity_forecast::core::loader::DatasetLoader;
use commodity_forecast::core::ModelOrder;
use commodity_forecast::utils::dates::default_date_formats;
use commodity_forecast::{router, ArimaForecaster, ForecastService, LocalStorage};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// wheat.csv：X 地區 2023-01-01 到 2023-06-30 每日價格，Y 地區整欄空白
fn write_wheat_dataset(dir: &TempDir) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();

    let mut csv = String::from("Date,X,Y\n");
    let mut date = start;
    let mut i = 0;
    while date <= end {
        let price = 200.0 + 0.25 * i as f64 + (i as f64 * 0.7).sin() * 3.0;
        csv.push_str(&format!("{},{:.3},\n", date.format("%Y-%m-%d"), price));
        date += Duration::days(1);
        i += 1;
    }

    std::fs::write(dir.path().join("wheat.csv"), csv).unwrap();
}

fn app(dir: &TempDir) -> Router {
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    let loader = DatasetLoader::new(storage, "Date".to_string(), default_date_formats());
    let forecaster = ArimaForecaster::new(ModelOrder::default()).unwrap();
    router(Arc::new(ForecastService::new(loader, forecaster)), true)
}

async fn post_predict(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_future_date_returns_prediction() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"wheat","state":"X","date":"2023-07-15"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let price = body["predicted_price"].as_f64().expect("numeric prediction");
    assert!(price.is_finite());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_last_available_date_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"wheat","state":"X","date":"2023-06-30"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("2023-06-30"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_earlier_date_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"wheat","state":"X","date":"2023-03-01"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2023-06-30"));
}

#[tokio::test]
async fn test_missing_fields() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(app(&dir), r#"{"commodity":"wheat"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameters");
}

#[tokio::test]
async fn test_empty_body() {
    let dir = TempDir::new().unwrap();

    let (status, body) = post_predict(app(&dir), "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");
}

#[tokio::test]
async fn test_malformed_json() {
    let dir = TempDir::new().unwrap();

    let (status, body) = post_predict(app(&dir), "{\"commodity\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_far_future_date_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"wheat","state":"X","date":"+200000-01-01"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Prediction date is too far ahead"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_oversized_body_gets_json_error() {
    let dir = TempDir::new().unwrap();
    let oversized = format!(r#"{{"commodity":"{}"}}"#, "w".repeat(3 * 1024 * 1024));

    let (status, body) = post_predict(app(&dir), &oversized).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_region() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"wheat","state":"Atlantis","date":"2023-07-15"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data found for region: Atlantis");
}

#[tokio::test]
async fn test_region_without_values() {
    let dir = TempDir::new().unwrap();
    write_wheat_dataset(&dir);

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"wheat","state":"Y","date":"2023-07-15"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data found for region: Y");
}

#[tokio::test]
async fn test_unknown_commodity() {
    let dir = TempDir::new().unwrap();

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"barley","state":"X","date":"2023-07-15"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No dataset found for commodity: barley");
}

#[tokio::test]
async fn test_path_traversal_commodity() {
    let dir = TempDir::new().unwrap();

    let (status, _) = post_predict(
        app(&dir),
        r#"{"commodity":"../wheat","state":"X","date":"2023-07-15"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_dataset_is_server_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rice.csv"), "Day,X\n2023-01-01,1\n").unwrap();

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"rice","state":"X","date":"2023-07-15"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("missing date column"));
}

#[tokio::test]
async fn test_too_short_series_is_model_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("oats.csv"),
        "Date,X\n2023-01-01,1\n2023-01-02,2\n",
    )
    .unwrap();

    let (status, body) = post_predict(
        app(&dir),
        r#"{"commodity":"oats","state":"X","date":"2023-01-05"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error during prediction");
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();

    let response = app(&dir)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "alive");
}
