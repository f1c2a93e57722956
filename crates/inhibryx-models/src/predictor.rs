//! Predictor loading and inference.
//!
//! Two persisted predictor formats sit behind one capability trait:
//!
//! - `model/`     a candle neural network: `config.json` declaring layer
//!                widths plus `model.safetensors` weights
//! - `model.json` a generic serialized estimator: a linear model or an
//!                additive tree ensemble
//!
//! Resolution tries the directory first and falls back to the single
//! file, mirroring how the artifacts are produced by the training side.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use inhibryx_common::{InhibryxError, Result};

use crate::frame::FeatureFrame;

/// A loaded predictor: one scalar output per input row.
pub trait Predictor: Send + Sync + std::fmt::Debug {
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<f64>>;
    fn kind(&self) -> &'static str;
}

/// Load the predictor under `base`: `base/model/` (neural network) if
/// the directory exists, otherwise `base/model.json` (estimator).
pub fn load_predictor(base: &Path) -> Result<Box<dyn Predictor>> {
    let model_dir = base.join("model");
    if model_dir.is_dir() {
        debug!(path = %model_dir.display(), "Loading neural predictor");
        return Ok(Box::new(NeuralPredictor::load(&model_dir)?));
    }
    let estimator_path = base.join("model.json");
    if estimator_path.is_file() {
        debug!(path = %estimator_path.display(), "Loading estimator predictor");
        return Ok(Box::new(EstimatorPredictor::load(&estimator_path)?));
    }
    Err(InhibryxError::ArtifactLoad(format!(
        "no predictor at {} (neither model/ nor model.json)",
        base.display()
    )))
}

// ── Generic serialized estimator ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Estimator {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        base_score: f64,
        trees: Vec<Tree>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Tree {
    fn evaluate(&self, row: &[f64]) -> Result<f64> {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = row.get(*feature).copied().ok_or_else(|| {
                        InhibryxError::ArtifactLoad(format!(
                            "tree references feature index {} beyond row width {}",
                            feature,
                            row.len()
                        ))
                    })?;
                    idx = if value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(InhibryxError::ArtifactLoad(format!(
                        "tree walk reached missing node {}",
                        idx
                    )))
                }
            }
        }
    }
}

/// Estimator predictor backed by `model.json`.
#[derive(Debug)]
pub struct EstimatorPredictor {
    estimator: Estimator,
}

impl EstimatorPredictor {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InhibryxError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
        let estimator: Estimator = serde_json::from_str(&raw).map_err(|e| {
            InhibryxError::ArtifactLoad(format!("{}: corrupt estimator: {}", path.display(), e))
        })?;
        Ok(Self { estimator })
    }
}

impl Predictor for EstimatorPredictor {
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<f64>> {
        features
            .rows()
            .iter()
            .map(|row| match &self.estimator {
                Estimator::Linear { coefficients, intercept } => {
                    if coefficients.len() != row.len() {
                        return Err(InhibryxError::ArtifactLoad(format!(
                            "linear model expects {} features, frame has {}",
                            coefficients.len(),
                            row.len()
                        )));
                    }
                    Ok(intercept
                        + coefficients
                            .iter()
                            .zip(row.iter())
                            .map(|(c, x)| c * x)
                            .sum::<f64>())
                }
                Estimator::TreeEnsemble { base_score, trees } => {
                    let mut score = *base_score;
                    for tree in trees {
                        score += tree.evaluate(row)?;
                    }
                    Ok(score)
                }
            })
            .collect()
    }

    fn kind(&self) -> &'static str {
        "estimator"
    }
}

// ── Candle neural network ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NeuralConfig {
    input_dim: usize,
    hidden: Vec<usize>,
}

/// Feed-forward regression network loaded from a safetensors directory.
#[derive(Debug)]
pub struct NeuralPredictor {
    layers: Vec<Linear>,
    input_dim: usize,
    device: Device,
}

impl NeuralPredictor {
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.json");
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            InhibryxError::ArtifactLoad(format!("{}: {}", config_path.display(), e))
        })?;
        let config: NeuralConfig = serde_json::from_str(&raw).map_err(|e| {
            InhibryxError::ArtifactLoad(format!("{}: corrupt config: {}", config_path.display(), e))
        })?;

        let weights_path = dir.join("model.safetensors");
        if !weights_path.is_file() {
            return Err(InhibryxError::ArtifactLoad(format!(
                "{}: missing model.safetensors",
                dir.display()
            )));
        }

        let device = Device::Cpu;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
                .map_err(|e| {
                    InhibryxError::ArtifactLoad(format!(
                        "{}: {}",
                        weights_path.display(),
                        e
                    ))
                })?
        };

        let mut widths = vec![config.input_dim];
        widths.extend(&config.hidden);
        widths.push(1);

        let mut layers = Vec::with_capacity(widths.len() - 1);
        for i in 0..widths.len() - 1 {
            let layer = linear(widths[i], widths[i + 1], vb.pp(format!("layers.{}", i)))
                .map_err(|e| {
                    InhibryxError::ArtifactLoad(format!("layer {} of {}: {}", i, dir.display(), e))
                })?;
            layers.push(layer);
        }

        Ok(Self { layers, input_dim: config.input_dim, device })
    }

    fn forward(&self, input: Tensor) -> candle_core::Result<Tensor> {
        let mut xs = input;
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            xs = layer.forward(&xs)?;
            if i < last {
                xs = xs.relu()?;
            }
        }
        Ok(xs)
    }
}

impl Predictor for NeuralPredictor {
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<f64>> {
        let rows = features.row_count();
        let cols = features.columns().len();
        if cols != self.input_dim {
            return Err(InhibryxError::ArtifactLoad(format!(
                "network expects {} features, frame has {}",
                self.input_dim, cols
            )));
        }

        let flat: Vec<f32> = features
            .rows()
            .iter()
            .flat_map(|row| row.iter().map(|&v| v as f32))
            .collect();
        let input = Tensor::from_vec(flat, (rows, cols), &self.device)
            .map_err(|e| InhibryxError::Other(anyhow::anyhow!("tensor build failed: {}", e)))?;

        let output = self
            .forward(input)
            .and_then(|t| t.flatten_all()?.to_vec1::<f32>())
            .map_err(|e| InhibryxError::Other(anyhow::anyhow!("inference failed: {}", e)))?;

        Ok(output.into_iter().map(|v| v as f64).collect())
    }

    fn kind(&self) -> &'static str {
        "neural"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn frame(values: Vec<f64>) -> FeatureFrame {
        FeatureFrame::from_row(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("f{}", i), v))
                .collect(),
        )
    }

    #[test]
    fn test_linear_estimator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(br#"{"kind":"linear","coefficients":[0.5,-1.0],"intercept":6.0}"#)
            .unwrap();

        let predictor = EstimatorPredictor::load(&path).unwrap();
        let out = predictor.predict(&frame(vec![2.0, 3.0])).unwrap();
        assert_eq!(out, vec![6.0 + 1.0 - 3.0]);
    }

    #[test]
    fn test_linear_width_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(br#"{"kind":"linear","coefficients":[1.0],"intercept":0.0}"#)
            .unwrap();
        let predictor = EstimatorPredictor::load(&path).unwrap();
        assert!(predictor.predict(&frame(vec![1.0, 2.0])).is_err());
    }

    #[test]
    fn test_tree_ensemble() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        // One stump: f0 <= 1.0 -> 0.5, else -0.5; base 6.0
        let json = r#"{
            "kind": "tree_ensemble",
            "base_score": 6.0,
            "trees": [{
                "nodes": [
                    {"feature": 0, "threshold": 1.0, "left": 1, "right": 2},
                    {"value": 0.5},
                    {"value": -0.5}
                ]
            }]
        }"#;
        std::fs::File::create(&path).unwrap().write_all(json.as_bytes()).unwrap();

        let predictor = EstimatorPredictor::load(&path).unwrap();
        assert_eq!(predictor.predict(&frame(vec![0.0])).unwrap(), vec![6.5]);
        assert_eq!(predictor.predict(&frame(vec![2.0])).unwrap(), vec![5.5]);
    }

    #[test]
    fn test_neural_predictor_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("config.json"))
            .unwrap()
            .write_all(br#"{"input_dim":2,"hidden":[2]}"#)
            .unwrap();

        let device = Device::Cpu;
        let mut tensors: HashMap<String, Tensor> = HashMap::new();
        tensors.insert(
            "layers.0.weight".to_string(),
            Tensor::from_vec(vec![1f32, 0.0, 0.0, 1.0], (2, 2), &device).unwrap(),
        );
        tensors.insert(
            "layers.0.bias".to_string(),
            Tensor::from_vec(vec![0f32, 0.0], 2, &device).unwrap(),
        );
        tensors.insert(
            "layers.1.weight".to_string(),
            Tensor::from_vec(vec![1f32, 1.0], (1, 2), &device).unwrap(),
        );
        tensors.insert(
            "layers.1.bias".to_string(),
            Tensor::from_vec(vec![0.5f32], 1, &device).unwrap(),
        );
        candle_core::safetensors::save(&tensors, dir.path().join("model.safetensors")).unwrap();

        let predictor = NeuralPredictor::load(dir.path()).unwrap();
        let out = predictor.predict(&frame(vec![1.0, 2.0])).unwrap();
        assert_eq!(out.len(), 1);
        // identity layer, relu, then sum + 0.5
        assert!((out[0] - 3.5).abs() < 1e-5);
    }

    #[test]
    fn test_load_predictor_prefers_directory() {
        let dir = tempfile::tempdir().unwrap();
        // only model.json present -> estimator
        std::fs::File::create(dir.path().join("model.json"))
            .unwrap()
            .write_all(br#"{"kind":"linear","coefficients":[1.0],"intercept":2.0}"#)
            .unwrap();
        let predictor = load_predictor(dir.path()).unwrap();
        assert_eq!(predictor.kind(), "estimator");
    }

    #[test]
    fn test_load_predictor_missing_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_predictor(dir.path()).unwrap_err(),
            InhibryxError::ArtifactLoad(_)
        ));
    }
}
