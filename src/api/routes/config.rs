use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::api::AppState;
use crate::infrastructure::config::OfficialPreset;

#[derive(Debug, Serialize)]
pub struct OfficialPresetsResponse {
    pub success: bool,
    pub presets: Vec<OfficialPreset>,
}

/// GET /api/config/official - Official scenario/channel preset bundles
pub async fn get_official_presets(
    State(state): State<Arc<AppState>>,
) -> Json<OfficialPresetsResponse> {
    Json(OfficialPresetsResponse {
        success: true,
        presets: state.presets.get_all(),
    })
}

/// POST /api/config/official/reload - Re-read presets from the environment
pub async fn reload_official_presets(
    State(state): State<Arc<AppState>>,
) -> Json<OfficialPresetsResponse> {
    state.presets.reload();
    Json(OfficialPresetsResponse {
        success: true,
        presets: state.presets.get_all(),
    })
}
