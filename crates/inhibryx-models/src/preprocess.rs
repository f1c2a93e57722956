//! Feature preprocessing: raw chemistry output to model input.
//!
//! The subsetting step is the correctness-critical operation in the
//! whole pipeline: the output column order must exactly match the
//! model's training-time order, and a missing selected feature is a
//! hard error rather than a silent truncation.

use inhibryx_chem::{descriptors, fingerprint, Molecule};
use inhibryx_common::{InhibryxError, Result};

use crate::frame::FeatureFrame;
use crate::registry::{FeatureMethod, ModelBundle};

/// Compute the raw feature frame for one molecule with the given method.
pub fn raw_features(molecule: &Molecule, method: FeatureMethod) -> FeatureFrame {
    match method {
        FeatureMethod::Descriptors => FeatureFrame::from_row(descriptors::compute(molecule)),
        FeatureMethod::Fingerprints => FeatureFrame::from_row(
            fingerprint::compute(molecule)
                .into_iter()
                .map(|(name, bit)| (name, bit as f64))
                .collect(),
        ),
    }
}

/// Apply the bundle's preprocessing to a raw feature frame.
///
/// Descriptors: learned transform (imputation + scaling), then subset to
/// the selected features. Fingerprints: subset only. Both paths yield
/// columns in exactly the selected-feature order.
pub fn prepare(raw: &FeatureFrame, bundle: &ModelBundle, method: FeatureMethod) -> Result<FeatureFrame> {
    match method {
        FeatureMethod::Descriptors => {
            let preprocessor = bundle.preprocessor.as_ref().ok_or_else(|| {
                InhibryxError::ArtifactLoad(
                    "descriptors bundle loaded without a preprocessor".to_string(),
                )
            })?;
            let transformed = preprocessor.apply(raw);
            transformed.select(&bundle.selected_features)
        }
        FeatureMethod::Fingerprints => raw.select(&bundle.selected_features),
    }
}
