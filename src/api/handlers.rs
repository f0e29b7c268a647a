use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{RecommendationsResponse, UserId},
    services::recommender::RecommenderService,
};

use super::AppState;

/// Query parameters for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    /// 1-indexed page, defaults to the first page
    pub page: Option<usize>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Generates a page of collaborative-filtering recommendations for a user
///
/// Storage failures on the structural reads surface as 400. A run that
/// succeeds but finds nothing is a 200 with an empty list and a hint to
/// review more resources; "found nothing" is not an error.
pub async fn recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let page = params.page.unwrap_or(1);

    let recommender = RecommenderService::new(state.store.clone());
    let recommendations = recommender
        .recommendations_for(user_id, page)
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let message = if recommendations.is_empty() {
        "Could not get any recommendations for you. Maybe try going through the discover page and reviewing some resources?".to_string()
    } else {
        "Here are some recommendations for you.".to_string()
    };

    Ok(Json(RecommendationsResponse {
        message,
        recommendations,
    }))
}
