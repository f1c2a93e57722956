//! Batch predictor: CSV upload in, CSV download out.

use axum::body::Bytes;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use inhibryx_models::batch::predict_csv;
use inhibryx_models::FeatureMethod;

use crate::handlers::{escape, page};
use crate::state::SharedState;

const DOWNLOAD_FILENAME: &str = "pic50_prediction.csv";

pub async fn batch_page(State(state): State<SharedState>) -> Html<String> {
    Html(page("Multiple pIC50 Predictor", &form_html(&state, None)))
}

pub async fn batch_submit(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Response {
    match run_batch(&state, multipart).await {
        Ok(csv_bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
                ),
            ],
            csv_bytes,
        )
            .into_response(),
        Err(message) => {
            Html(page("Multiple pIC50 Predictor", &form_html(&state, Some(&message)))).into_response()
        }
    }
}

async fn run_batch(state: &SharedState, mut multipart: Multipart) -> Result<Vec<u8>, String> {
    let mut target: Option<String> = None;
    let mut method: Option<String> = None;
    let mut file: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Upload failed: {}", e))?
    {
        match field.name() {
            Some("target") => {
                target = Some(field.text().await.map_err(|e| format!("Upload failed: {}", e))?)
            }
            Some("method") => {
                method = Some(field.text().await.map_err(|e| format!("Upload failed: {}", e))?)
            }
            Some("file") => {
                let bytes = field.bytes().await.map_err(|e| format!("Upload failed: {}", e))?;
                file = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let target = target.ok_or_else(|| "No target was selected!".to_string())?;
    let method = method
        .as_deref()
        .and_then(FeatureMethod::parse)
        .ok_or_else(|| "No valid feature method was selected!".to_string())?;
    let file = file.filter(|f| !f.is_empty()).ok_or_else(|| "No file selected!".to_string())?;

    predict_csv(&state.pipeline, &target, method, &file).map_err(|e| {
        warn!(error = %e, "Batch prediction failed");
        escape(&e.to_string())
    })
}

#[derive(Deserialize)]
pub struct ApiBatchParams {
    pub target: String,
    pub method: String,
}

/// CSV-in/CSV-out batch endpoint for programmatic callers.
pub async fn api_predict_batch(
    State(state): State<SharedState>,
    Query(params): Query<ApiBatchParams>,
    body: Bytes,
) -> Response {
    let Some(method) = FeatureMethod::parse(&params.method) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("unknown method {:?}", params.method),
        )
            .into_response();
    };

    match predict_csv(&state.pipeline, &params.target, method, &body) {
        Ok(csv_bytes) => (
            [(header::CONTENT_TYPE, "text/csv".to_string())],
            csv_bytes,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "API batch prediction failed");
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
    }
}

fn form_html(state: &SharedState, error: Option<&str>) -> String {
    let targets = state.pipeline.registry().targets();
    let target_options: String = targets
        .iter()
        .map(|t| format!(r#"<option value="{0}">{0}</option>"#, escape(t)))
        .collect();

    let error_box = error
        .map(|e| format!(r#"<div class="error">{}</div>"#, e))
        .unwrap_or_default();

    format!(
        r#"<div class="card">
    <h1>Multiple pIC50 Predictor</h1>
    {error_box}
    <p>Upload a CSV file with a <span class="mono">SMILES</span> column (exact header).
    All other columns pass through unchanged; the result adds a
    <span class="mono">Predicted pIC50</span> column. If any row holds an invalid
    SMILES, the whole file is rejected.</p>
    <form method="POST" action="/batch" enctype="multipart/form-data">
        <label for="target">Target human protein</label>
        <select id="target" name="target">{target_options}</select>
        <label for="method">Descriptor/Fingerprint</label>
        <select id="method" name="method">
            <option value="Descriptors">Descriptors</option>
            <option value="Fingerprints">Fingerprints</option>
        </select>
        <label for="file">Choose a file</label>
        <input type="file" id="file" name="file" accept=".csv">
        <button type="submit">Predict pIC50</button>
    </form>
</div>"#,
        error_box = error_box,
        target_options = target_options
    )
}
