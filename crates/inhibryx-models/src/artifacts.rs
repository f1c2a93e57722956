//! On-disk artifact formats: selected-feature lists and preprocessors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use inhibryx_common::{InhibryxError, Result};

use crate::frame::FeatureFrame;

/// Load a selected-feature list: a JSON array of column names in the
/// model's training order.
pub fn load_selected_features(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        InhibryxError::ArtifactLoad(format!("{}: {}", path.display(), e))
    })?;
    let features: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
        InhibryxError::ArtifactLoad(format!("{}: not a JSON string array: {}", path.display(), e))
    })?;
    if features.is_empty() {
        return Err(InhibryxError::ArtifactLoad(format!(
            "{}: empty selected-feature list",
            path.display()
        )));
    }
    Ok(features)
}

/// Per-column statistics for imputation and scaling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    /// Imputation value for missing/non-finite inputs.
    pub median: f64,
    pub mean: f64,
    pub std: f64,
}

/// A persisted preprocessing transform: median imputation followed by
/// standard scaling, with a declared output column order. Fit at
/// training time; only applied here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub columns: Vec<ColumnStats>,
}

impl Preprocessor {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            InhibryxError::ArtifactLoad(format!("{}: {}", path.display(), e))
        })?;
        let preprocessor: Preprocessor = serde_json::from_str(&raw).map_err(|e| {
            InhibryxError::ArtifactLoad(format!("{}: corrupt preprocessor: {}", path.display(), e))
        })?;
        if preprocessor.columns.is_empty() {
            return Err(InhibryxError::ArtifactLoad(format!(
                "{}: preprocessor declares no columns",
                path.display()
            )));
        }
        Ok(preprocessor)
    }

    /// Output column names, in declared order.
    pub fn output_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Apply the transform: for each declared column, impute the median
    /// when the input is missing or non-finite, then scale to
    /// `(x - mean) / std`. The output frame holds exactly the declared
    /// columns in declared order.
    pub fn apply(&self, raw: &FeatureFrame) -> FeatureFrame {
        let columns = self.output_columns();
        let rows = (0..raw.row_count())
            .map(|r| {
                self.columns
                    .iter()
                    .map(|stats| {
                        let value = raw
                            .get(r, &stats.name)
                            .filter(|v| v.is_finite())
                            .unwrap_or(stats.median);
                        let divisor = if stats.std.abs() < 1e-12 { 1.0 } else { stats.std };
                        (value - stats.mean) / divisor
                    })
                    .collect()
            })
            .collect();
        FeatureFrame::new(columns, rows)
    }
}
