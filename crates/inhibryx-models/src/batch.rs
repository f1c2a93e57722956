//! Batch (CSV) prediction.
//!
//! The uploaded file must carry a `SMILES` column with that exact,
//! case-sensitive header. Validation is all-or-nothing: one bad row
//! rejects the whole file before any prediction runs, so a batch either
//! yields a prediction for every row or none at all. Output is the
//! input, row order preserved, plus one appended `Predicted pIC50`
//! column.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::info;

use inhibryx_chem::Molecule;
use inhibryx_common::{InhibryxError, Result};

use crate::pipeline::{round_to, PredictionPipeline};
use crate::preprocess;
use crate::registry::FeatureMethod;

pub const SMILES_COLUMN: &str = "SMILES";
pub const PREDICTION_COLUMN: &str = "Predicted pIC50";

/// Run batch prediction over CSV bytes, returning CSV bytes.
pub fn predict_csv(
    pipeline: &PredictionPipeline,
    target: &str,
    method: FeatureMethod,
    input: &[u8],
) -> Result<Vec<u8>> {
    let mut reader = ReaderBuilder::new().from_reader(input);
    let headers = reader.headers()?.clone();

    let smiles_idx = headers
        .iter()
        .position(|h| h == SMILES_COLUMN)
        .ok_or_else(|| InhibryxError::MissingColumn(SMILES_COLUMN.to_string()))?;

    let mut records: Vec<StringRecord> = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    // All-or-nothing gate: every row must parse before any row predicts.
    let mut molecules = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let smiles = record.get(smiles_idx).unwrap_or("");
        let molecule = Molecule::parse(smiles).map_err(|_| {
            InhibryxError::InvalidInput(format!(
                "row {}: SMILES {:?} is not valid notation",
                i + 2, // header is line 1
                smiles
            ))
        })?;
        molecules.push(molecule);
    }

    let predictions = if molecules.is_empty() {
        Vec::new()
    } else {
        let bundle = pipeline.registry().bundle(target, method)?;
        let mut frame = preprocess::raw_features(&molecules[0], method);
        for molecule in &molecules[1..] {
            frame.stack(preprocess::raw_features(molecule, method))?;
        }
        let prepared = preprocess::prepare(&frame, &bundle, method)?;
        bundle
            .predictor
            .predict(&prepared)?
            .into_iter()
            .map(|v| round_to(v, 2))
            .collect()
    };

    info!(rows = predictions.len(), target = %target, "Batch prediction complete");

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let mut out_headers = headers.clone();
    out_headers.push_field(PREDICTION_COLUMN);
    writer.write_record(&out_headers)?;

    for (record, pic50) in records.iter().zip(predictions) {
        let mut row = record.clone();
        row.push_field(&pic50.to_string());
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| InhibryxError::Other(anyhow::anyhow!("CSV write failed: {}", e)))
}
