//! HTTP surface: `POST /predict` and `GET /health`.

use crate::core::{ForecastRequest, Predictor};
use crate::utils::error::{ForecastError, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    predictor: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }
}

/// `/predict` 的請求內容；地區在對外介面上叫 `state`
#[derive(Debug, Default, Deserialize)]
pub struct PredictPayload {
    pub commodity: Option<String>,
    pub state: Option<String>,
    pub date: Option<String>,
}

impl PredictPayload {
    pub fn into_request(self) -> Result<ForecastRequest> {
        let present = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        match (present(self.commodity), present(self.state), present(self.date)) {
            (Some(commodity), Some(region), Some(date)) => Ok(ForecastRequest {
                commodity,
                region,
                date,
            }),
            _ => Err(ForecastError::validation("Missing required parameters")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: e.user_friendly_message(),
        }
    }
}

/// 本體讀取失敗（例如超過大小上限）同樣以 JSON 回應
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn router(predictor: Arc<dyn Predictor>, permissive_cors: bool) -> Router {
    let app = Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(AppState::new(predictor))
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app.layer(cors)
    } else {
        app
    }
}

/// 解析請求本體；空本體或 `null` 視為沒有資料
pub fn parse_payload(body: &[u8]) -> Result<PredictPayload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ForecastError::validation("No data provided"));
    }

    let payload: Option<PredictPayload> = serde_json::from_slice(body)
        .map_err(|e| ForecastError::validation(format!("Invalid JSON body: {}", e)))?;

    payload.ok_or_else(|| ForecastError::validation("No data provided"))
}

async fn predict(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    tracing::info!("Received request");

    let body = body.map_err(|rejection| {
        tracing::warn!("❌ Rejected request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let request = parse_payload(&body)
        .and_then(PredictPayload::into_request)
        .map_err(|e| {
            tracing::warn!("❌ Rejected request: {}", e);
            ApiError::from(e)
        })?;

    tracing::info!(
        "Data received: Commodity: {}, State: {}, Date: {}",
        request.commodity,
        request.region,
        request.date
    );

    match state.predictor.predict(request.clone()).await {
        Ok(result) => {
            tracing::info!(
                "✅ Prediction for {}/{} on {}: {} ({} steps from {})",
                result.commodity,
                result.region,
                result.target_date,
                result.predicted_price,
                result.steps,
                result.last_observed
            );
            Ok(Json(PredictResponse {
                predicted_price: result.predicted_price,
            }))
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(
                    "❌ Prediction rejected for commodity={}, state={}, date={}: {}",
                    request.commodity,
                    request.region,
                    request.date,
                    e
                );
            } else {
                tracing::error!(
                    "❌ Prediction failed for commodity={}, state={}, date={}: {} (Category: {:?})",
                    request.commodity,
                    request.region,
                    request.date,
                    e,
                    e.category()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }
            Err(ApiError::from(e))
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
