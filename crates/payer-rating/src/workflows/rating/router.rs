use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::service::{ImportRequest, RatingService, RatingServiceError};
use super::RatingError;

/// Router builder exposing ledger import, payer lookup and rating endpoints.
pub fn rating_router(service: Arc<RatingService>) -> Router {
    Router::new()
        .route("/api/v1/ledger/import", post(import_handler))
        .route("/api/v1/payers", get(list_payers_handler))
        .route("/api/v1/payers/:payer_id", get(payer_handler))
        .route("/api/v1/ratings", post(rate_handler))
        .route("/api/v1/ratings/last", get(last_rating_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PayerQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateRequest {
    pub payer_id: String,
    pub check_amount: f64,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

pub(crate) async fn import_handler(
    State(service): State<Arc<RatingService>>,
    axum::Json(request): axum::Json<ImportRequest>,
) -> Response {
    match service.import(&request) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_payers_handler(
    State(service): State<Arc<RatingService>>,
    Query(query): Query<PayerQuery>,
) -> Response {
    let payers = service.payers(query.search.as_deref());
    (StatusCode::OK, axum::Json(payers)).into_response()
}

pub(crate) async fn payer_handler(
    State(service): State<Arc<RatingService>>,
    Path(payer_id): Path<String>,
) -> Response {
    match service.payer(&payer_id) {
        Some(payer) => (StatusCode::OK, axum::Json(payer)).into_response(),
        None => {
            let payload = json!({
                "error": format!("payer {payer_id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn rate_handler(
    State(service): State<Arc<RatingService>>,
    axum::Json(request): axum::Json<RateRequest>,
) -> Response {
    match service.rate(&request.payer_id, request.check_amount, request.as_of) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn last_rating_handler(State(service): State<Arc<RatingService>>) -> Response {
    match service.last_calculation() {
        Some(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        None => {
            let payload = json!({
                "error": "no rating has been calculated yet",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(error: RatingServiceError) -> Response {
    let status = match &error {
        RatingServiceError::Csv { .. } => StatusCode::BAD_REQUEST,
        RatingServiceError::Rating(RatingError::PayerNotFound { .. }) => StatusCode::NOT_FOUND,
        RatingServiceError::Ingest(_) | RatingServiceError::Rating(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
