use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::area::{service_area_list, AreaDetection, AreaError, AreaInfo};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ─── GET /api/detect-area ────────────────────────────────────────

#[derive(Deserialize)]
pub struct DetectQuery {
    pub query: Option<String>,
}

/// Body for an undetermined area: the caller should ask the user to pick one.
#[derive(Serialize)]
struct NotDeterminedResponse {
    found: bool,
    query: String,
    message: String,
    areas: Vec<AreaInfo>,
}

pub async fn detect_area(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetectQuery>,
) -> Result<Json<AreaDetection>, Response> {
    let start = Instant::now();

    let query = params.query.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter").into_response());
    }

    // Provider calls block; keep them off the async workers.
    let worker = Arc::clone(&state);
    let q = query.clone();
    let resolved = tokio::task::spawn_blocking(move || worker.resolver.resolve(&q))
        .await
        .map_err(|e| {
            error!(error = %e, "resolver task failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Area resolution failed").into_response()
        })?;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match resolved {
        Ok(detection) => {
            info!(%query, area = detection.area_id(), elapsed_ms, "GET /api/detect-area");
            Ok(Json(detection))
        }
        Err(err) => {
            info!(%query, elapsed_ms, "GET /api/detect-area -> not determined");
            let message = err.to_string();
            match err {
                AreaError::NotDetermined { query, areas } => {
                    let resp = NotDeterminedResponse {
                        found: false,
                        query,
                        message,
                        areas: areas.into_iter().map(AreaInfo::from).collect(),
                    };
                    Err((StatusCode::NOT_FOUND, Json(resp)).into_response())
                }
                AreaError::NoInput => Err(api_error(StatusCode::BAD_REQUEST, message).into_response()),
            }
        }
    }
}

// ─── GET /api/areas ──────────────────────────────────────────────

pub async fn area_list() -> Json<Vec<AreaInfo>> {
    Json(service_area_list())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{AreaResolver, Confidence, ResolverConfig, ServiceArea};

    fn offline_state() -> Arc<AppState> {
        let config = ResolverConfig { offline: true, ..Default::default() };
        Arc::new(AppState { resolver: AreaResolver::new(&config) })
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_detect_area_found() {
        let params = DetectQuery { query: Some("Penang Sentral".into()) };
        let Json(detection) = detect_area(State(offline_state()), Query(params)).await.ok().unwrap();
        assert_eq!(detection.area, Some(ServiceArea::Penang));
        assert_eq!(detection.confidence, Confidence::Medium);
    }

    #[tokio::test]
    async fn test_detect_area_missing_query() {
        let params = DetectQuery { query: Some("  ".into()) };
        let resp = detect_area(State(offline_state()), Query(params)).await.err().unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_detect_area_not_determined_lists_areas() {
        let params = DetectQuery { query: Some("asdkfjasldkfj_not_a_place".into()) };
        let resp = detect_area(State(offline_state()), Query(params)).await.err().unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert_eq!(body["found"], false);
        assert_eq!(body["query"], "asdkfjasldkfj_not_a_place");
        let areas = body["areas"].as_array().unwrap();
        assert_eq!(areas.len(), ServiceArea::ALL.len());
        assert_eq!(areas[0]["id"], "klang-valley");
    }

    #[tokio::test]
    async fn test_area_list() {
        let Json(areas) = area_list().await;
        assert_eq!(areas.len(), 12);
        assert!(areas.iter().any(|a| a.id == "alor-setar" && a.states == ["Kedah"]));
    }
}
