//! inhibryx-models — Model artifacts and the prediction pipeline.
//!
//! This crate owns everything between a parsed molecule and a pIC50
//! number:
//! 1. Feature frames (ordered named columns)
//! 2. Artifact loading: selected features, preprocessor, predictor
//! 3. The on-disk model catalog and its process-lifetime cache
//! 4. Feature preprocessing for both representation methods
//! 5. The single-molecule prediction pipeline
//! 6. Batch (CSV) prediction

pub mod artifacts;
pub mod batch;
pub mod frame;
pub mod pipeline;
pub mod predictor;
pub mod preprocess;
pub mod registry;

pub use frame::FeatureFrame;
pub use pipeline::{PredictionOutcome, PredictionPipeline};
pub use registry::{FeatureMethod, ModelBundle, Registry};

pub type Result<T> = inhibryx_common::Result<T>;
