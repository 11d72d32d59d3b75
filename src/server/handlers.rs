use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub prompt_response: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let top_k = request.top_k.unwrap_or(state.default_top_k);
    let answer = state.service.answer(&request.query, top_k).await?;

    Ok(Json(SearchResponse {
        prompt_response: answer.response,
    }))
}
