//! Shared application state for the web server.

use std::sync::Arc;

use inhibryx_chem::ChemblClient;
use inhibryx_common::{AppConfig, Result};
use inhibryx_models::{PredictionPipeline, Registry};

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub pipeline: PredictionPipeline,
    pub config: AppConfig,
}

impl AppState {
    /// Scan the model catalog and build the pipeline.
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = Arc::new(Registry::scan(&config.models_root)?);
        let chembl = ChemblClient::new(&config.chembl)?;
        let pipeline = PredictionPipeline::new(registry, chembl);
        Ok(Self { pipeline, config })
    }
}

pub type SharedState = Arc<AppState>;
