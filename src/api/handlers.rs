use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{AlgorithmInfo, RecommendationAlgorithm, RecommendationPage, DEFAULT_PAGE_SIZE},
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub algorithm: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl RecommendationQuery {
    /// Requested algorithm. Absent means collaborative; unrecognized
    /// selectors resolve to `default`.
    fn algorithm(&self, default: RecommendationAlgorithm) -> RecommendationAlgorithm {
        match self.algorithm.as_deref() {
            None => RecommendationAlgorithm::Collaborative,
            Some(selector) => selector.parse().unwrap_or_else(|_| {
                tracing::warn!(selector, default = %default, "Unknown algorithm selector, using default");
                default
            }),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the available recommendation algorithms
pub async fn list_algorithms(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, AlgorithmInfo>> {
    Json(state.recommendations.list_algorithms())
}

/// Get a page of recommendations for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationPage>> {
    let algorithm = query.algorithm(state.recommendations.default_algorithm());

    let page = state
        .recommendations
        .get_recommendations(
            user_id,
            algorithm,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64),
        )
        .await?;

    Ok(Json(page))
}
