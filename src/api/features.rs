//! Feature registry and resolution endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::RegisteredFeature;

#[derive(Debug, Clone, Serialize)]
pub struct ListFeaturesResponse {
    pub features: Vec<RegisteredFeature>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveQuery {
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModelResponse {
    pub feature_id: String,
    pub model_id: String,
}

/// GET /features
pub async fn list_features(State(state): State<AppState>) -> Json<ListFeaturesResponse> {
    let features = state.model_kit.list_features();
    let total = features.len();

    Json(ListFeaturesResponse { features, total })
}

/// GET /features/{feature_id}/model
pub async fn resolve_model(
    State(state): State<AppState>,
    Path(feature_id): Path<String>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedModelResponse>, ApiError> {
    let model_id = match query.fallback.as_deref() {
        Some(fallback) => state.model_kit.get_model_or(&feature_id, fallback).await?,
        None => state.model_kit.get_model(&feature_id).await?,
    };

    Ok(Json(ResolvedModelResponse {
        feature_id,
        model_id,
    }))
}
