//! Override management endpoints

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{EffectiveConfig, FeatureOverride, OverridePatch};

/// Acknowledgement returned by mutations
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// GET /overrides
pub async fn list_overrides(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeatureOverride>>, ApiError> {
    debug!("Listing overrides");

    let overrides = state.model_kit.list_overrides().await?;
    Ok(Json(overrides))
}

/// GET /overrides/{feature_id}
pub async fn get_override(
    State(state): State<AppState>,
    Path(feature_id): Path<String>,
) -> Result<Json<EffectiveConfig>, ApiError> {
    debug!(feature_id = %feature_id, "Reading effective config");

    let config = state.model_kit.get_config(&feature_id).await?;
    Ok(Json(config))
}

/// POST /overrides/{feature_id}
pub async fn set_override(
    State(state): State<AppState>,
    Path(feature_id): Path<String>,
    Json(patch): Json<OverridePatch>,
) -> Result<Json<SuccessResponse>, ApiError> {
    debug!(feature_id = %feature_id, "Setting override");

    // The HTTP surface always requires an explicit model, even for registered features
    if patch.model_id.is_none() {
        return Err(ApiError::bad_request("modelId is required"));
    }

    state.model_kit.set_override(&feature_id, patch).await?;
    Ok(SuccessResponse::ok())
}

/// DELETE /overrides/{feature_id}
pub async fn clear_override(
    State(state): State<AppState>,
    Path(feature_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    debug!(feature_id = %feature_id, "Clearing override");

    state.model_kit.clear_override(&feature_id).await?;
    Ok(SuccessResponse::ok())
}
