//! The single-molecule prediction pipeline.
//!
//! validate → compute features → preprocess → predict → derive dose →
//! enrich. The first four stages are strict: any failure aborts with a
//! typed error. Enrichment (depiction, similar compounds) is
//! best-effort: a failure there degrades the outcome to a partial
//! result with a notice and never touches the numeric prediction.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use inhibryx_chem::{depict, ChemblClient, Molecule, SimilarCompound};
use inhibryx_common::Result;

use crate::preprocess;
use crate::registry::{FeatureMethod, Registry};

/// A completed prediction with its enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub smiles: String,
    pub target: String,
    pub method: String,
    /// Predicted pIC50, rounded to 2 decimals.
    pub pic50: f64,
    pub molecular_weight: f64,
    /// Mass in mg required to reach the predicted half-maximal
    /// inhibitory concentration.
    pub inhibition_dose_mg: f64,
    /// 2D structure rendering; absent when depiction failed.
    pub depiction_svg: Option<String>,
    /// Similar compounds from ChEMBL; absent when the service was
    /// unreachable.
    pub similar_compounds: Option<Vec<SimilarCompound>>,
    /// Human-readable notice when the similarity section degraded.
    pub similarity_notice: Option<String>,
}

/// Orchestrates predictions against the model registry.
pub struct PredictionPipeline {
    registry: Arc<Registry>,
    chembl: ChemblClient,
}

impl PredictionPipeline {
    pub fn new(registry: Arc<Registry>, chembl: ChemblClient) -> Self {
        Self { registry, chembl }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the full pipeline for one SMILES string.
    pub async fn predict(
        &self,
        smiles: &str,
        target: &str,
        method: FeatureMethod,
    ) -> Result<PredictionOutcome> {
        // InputReceived -> Validated
        let molecule = Molecule::parse(smiles)?;

        // Validated -> FeaturesComputed -> Preprocessed -> Predicted
        let pic50 = self.predict_validated(&molecule, target, method)?;

        let molecular_weight = molecule.molecular_weight();
        let dose = inhibition_dose(molecular_weight, pic50);
        info!(target = %target, method = %method, pic50 = pic50, "Prediction complete");

        // Predicted -> Rendered: best-effort enrichment
        let depiction_svg = Some(depict::to_svg(&molecule));
        let (similar_compounds, similarity_notice) = match self.chembl.find_similar(smiles).await {
            Ok(compounds) => (Some(compounds), None),
            Err(e) => {
                warn!(error = %e, "Similarity lookup degraded");
                (
                    None,
                    Some(
                        "The connection to the ChEMBL database has not been established. \
                         Similar molecules cannot be generated."
                            .to_string(),
                    ),
                )
            }
        };

        Ok(PredictionOutcome {
            smiles: smiles.to_string(),
            target: target.to_string(),
            method: method.display_name().to_string(),
            pic50,
            molecular_weight,
            inhibition_dose_mg: dose,
            depiction_svg,
            similar_compounds,
            similarity_notice,
        })
    }

    /// The strict stages for an already-validated molecule. Used by both
    /// the single pipeline and batch mode.
    pub fn predict_validated(
        &self,
        molecule: &Molecule,
        target: &str,
        method: FeatureMethod,
    ) -> Result<f64> {
        let bundle = self.registry.bundle(target, method)?;
        let raw = preprocess::raw_features(molecule, method);
        debug!(columns = raw.columns().len(), "Raw features computed");
        let prepared = preprocess::prepare(&raw, &bundle, method)?;
        let scores = bundle.predictor.predict(&prepared)?;
        let score = scores.first().copied().ok_or_else(|| {
            inhibryx_common::InhibryxError::ArtifactLoad(
                "predictor returned no output".to_string(),
            )
        })?;
        Ok(round_to(score, 2))
    }
}

/// Mass (mg) of a compound needed to reach its predicted half-maximal
/// inhibitory concentration: converts the log-scale pIC50 back to a
/// linear molar scale and on to mass. Fixed formula, not configurable.
pub fn inhibition_dose(molecular_weight: f64, pic50: f64) -> f64 {
    round_to(molecular_weight * 10f64.powf(-pic50) * 1000.0, 5)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inhibition_dose_formula() {
        // 300 g/mol at pIC50 6: 300 * 10^-6 * 1000 mg
        let dose = inhibition_dose(300.0, 6.0);
        assert!((dose - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_inhibition_dose_rounds_to_5_places() {
        let dose = inhibition_dose(123.456, 7.3);
        let rounded = round_to(dose, 5);
        assert_eq!(dose, rounded);
        assert!((dose - 0.00619).abs() < 1e-9);
    }

    #[test]
    fn test_higher_potency_needs_less_mass() {
        assert!(inhibition_dose(300.0, 8.0) < inhibition_dose(300.0, 5.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(6.12345, 2), 6.12);
        assert_eq!(round_to(6.126, 2), 6.13);
        assert_eq!(round_to(-1.005, 1), -1.0);
    }
}
