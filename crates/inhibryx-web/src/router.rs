//! Axum router — maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    batch::{api_predict_batch, batch_page, batch_submit},
    faq::faq_page,
    home::home_page,
    predict::{api_depict, api_predict, predict_page, predict_submit},
    targets::{api_target_methods, api_targets},
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/", get(home_page))
        .route("/predict", get(predict_page).post(predict_submit))
        .route("/batch", get(batch_page).post(batch_submit))
        .route("/faq", get(faq_page))

        // API endpoints
        .route("/api/targets", get(api_targets))
        .route("/api/targets/{target}/methods", get(api_target_methods))
        .route("/api/predict", post(api_predict))
        .route("/api/predict/batch", post(api_predict_batch))
        .route("/api/depict", get(api_depict))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
