//! Target catalog API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::state::SharedState;

/// List target proteins, sorted case-insensitively.
pub async fn api_targets(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "targets": state.pipeline.registry().targets() }))
}

/// List the feature methods available for one target.
pub async fn api_target_methods(
    State(state): State<SharedState>,
    Path(target): Path<String>,
) -> impl IntoResponse {
    match state.pipeline.registry().methods(&target) {
        Some(methods) => {
            let names: Vec<&str> = methods.iter().map(|m| m.display_name()).collect();
            Json(serde_json::json!({ "target": target, "methods": names })).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "error",
                "error": format!("unknown target {:?}", target)
            })),
        )
            .into_response(),
    }
}
