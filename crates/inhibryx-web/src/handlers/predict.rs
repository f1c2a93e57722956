//! Single-compound predictor: page, form submission, JSON API.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use tracing::warn;

use inhibryx_chem::{depict, Molecule};
use inhibryx_models::{FeatureMethod, PredictionOutcome};

use crate::handlers::{escape, page};
use crate::state::SharedState;

const SMILES_HELP_URL: &str =
    "https://en.wikipedia.org/wiki/Simplified_molecular-input_line-entry_system#Description";

#[derive(Deserialize, Default)]
pub struct PredictPageParams {
    pub target: Option<String>,
}

#[derive(Deserialize)]
pub struct PredictForm {
    pub target: String,
    pub method: String,
    pub smiles: String,
}

pub async fn predict_page(
    State(state): State<SharedState>,
    Query(params): Query<PredictPageParams>,
) -> Html<String> {
    Html(page("Single pIC50 Predictor", &form_html(&state, params.target.as_deref(), None)))
}

pub async fn predict_submit(
    State(state): State<SharedState>,
    Form(form): Form<PredictForm>,
) -> Html<String> {
    match run_prediction(&state, &form).await {
        Ok(outcome) => Html(page("Prediction result", &result_html(&outcome))),
        Err(message) => Html(page(
            "Single pIC50 Predictor",
            &form_html(&state, Some(&form.target), Some(&message)),
        )),
    }
}

/// Validate the form and run the pipeline; errors come back as
/// user-facing messages for the form page.
async fn run_prediction(
    state: &SharedState,
    form: &PredictForm,
) -> Result<PredictionOutcome, String> {
    let method = FeatureMethod::parse(&form.method)
        .ok_or_else(|| format!("Unknown feature method {:?}.", form.method))?;

    let smiles = form.smiles.trim();
    if smiles.is_empty() {
        return Err("No SMILES was entered!".to_string());
    }
    if smiles.len() > state.config.input.max_smiles_len {
        return Err(format!(
            "SMILES is longer than the {}-character limit.",
            state.config.input.max_smiles_len
        ));
    }
    if !Molecule::validate(smiles) {
        return Err(format!(
            r#"Incorrect SMILES was entered! Please refer to: <a href="{}">the SMILES notation reference</a>."#,
            SMILES_HELP_URL
        ));
    }

    state
        .pipeline
        .predict(smiles, &form.target, method)
        .await
        .map_err(|e| {
            warn!(error = %e, "Prediction failed");
            escape(&e.to_string())
        })
}

fn form_html(state: &SharedState, selected_target: Option<&str>, error: Option<&str>) -> String {
    let targets = state.pipeline.registry().targets();
    let selected = selected_target
        .filter(|t| targets.iter().any(|known| known == t))
        .map(|t| t.to_string())
        .or_else(|| targets.first().cloned());

    let target_options: String = targets
        .iter()
        .map(|t| {
            let attr = if Some(t) == selected.as_ref() { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, escape(t), attr)
        })
        .collect();

    let method_options: String = selected
        .as_deref()
        .and_then(|t| state.pipeline.registry().methods(t))
        .map(|methods| {
            methods
                .iter()
                .map(|m| format!(r#"<option value="{0}">{0}</option>"#, m.display_name()))
                .collect()
        })
        .unwrap_or_default();

    let error_box = error
        .map(|e| format!(r#"<div class="error">{}</div>"#, e))
        .unwrap_or_default();

    format!(
        r#"<div class="card">
    <h1>Single pIC50 Predictor</h1>
    {error_box}
    <form method="POST" action="/predict">
        <label for="target">Target human protein</label>
        <select id="target" name="target" onchange="window.location='/predict?target='+encodeURIComponent(this.value)">
            {target_options}
        </select>
        <label for="method">Predictions based on descriptors or Morgan fingerprints?</label>
        <select id="method" name="method">
            {method_options}
        </select>
        <label for="smiles">SMILES</label>
        <input type="text" id="smiles" name="smiles" maxlength="{max_len}" placeholder="e.g. CC(=O)Oc1ccccc1C(=O)O">
        <button type="submit">Predict pIC50</button>
    </form>
</div>"#,
        error_box = error_box,
        target_options = target_options,
        method_options = method_options,
        max_len = state.config.input.max_smiles_len
    )
}

fn result_html(outcome: &PredictionOutcome) -> String {
    let depiction = outcome
        .depiction_svg
        .as_deref()
        .map(|svg| format!(r#"<details open><summary>Display molecule</summary>{}</details>"#, svg))
        .unwrap_or_default();

    let similarity_section = match (&outcome.similar_compounds, &outcome.similarity_notice) {
        (Some(compounds), _) => {
            let rows: String = compounds
                .iter()
                .map(|c| {
                    format!(
                        r#"<tr><td>{}</td><td>{}</td><td>{:.2}</td><td class="mono">{}</td></tr>"#,
                        escape(&c.chembl_id),
                        escape(c.name.as_deref().unwrap_or("—")),
                        c.similarity,
                        escape(c.canonical_smiles.as_deref().unwrap_or("—")),
                    )
                })
                .collect();
            format!(
                r#"<table>
    <thead><tr><th>Molecule ChEMBL ID</th><th>Name</th><th>Similarity [in %]</th><th>SMILES</th></tr></thead>
    <tbody>{}</tbody>
</table>"#,
                rows
            )
        }
        (None, Some(notice)) => format!(r#"<div class="notice">{}</div>"#, escape(notice)),
        (None, None) => String::new(),
    };

    format!(
        r#"<div class="card">
    <h1>Prediction result</h1>
    <p>SMILES inputed: <span class="mono">{smiles}</span></p>
    {depiction}
    <p>Predicted bioactivity value: <strong>{pic50:.2}</strong></p>
    <p>The mass of the molecule required to inhibit "{target}" by 50%: <strong>{dose} mg</strong></p>
    <h2>Similar molecules to the given SMILES</h2>
    {similarity_section}
    <p><a href="/predict?target={target_link}">← Another prediction</a></p>
</div>"#,
        smiles = escape(&outcome.smiles),
        depiction = depiction,
        pic50 = outcome.pic50,
        target = escape(&outcome.target),
        dose = outcome.inhibition_dose_mg,
        similarity_section = similarity_section,
        target_link = escape(&outcome.target)
    )
}

// ── JSON API ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ApiPredictRequest {
    pub smiles: String,
    pub target: String,
    pub method: String,
}

pub async fn api_predict(
    State(state): State<SharedState>,
    Json(request): Json<ApiPredictRequest>,
) -> Json<serde_json::Value> {
    let Some(method) = FeatureMethod::parse(&request.method) else {
        return Json(serde_json::json!({
            "status": "error",
            "error": format!("unknown method {:?}", request.method)
        }));
    };

    match state.pipeline.predict(&request.smiles, &request.target, method).await {
        Ok(outcome) => Json(serde_json::json!({ "status": "success", "result": outcome })),
        Err(e) => Json(serde_json::json!({ "status": "error", "error": e.to_string() })),
    }
}

#[derive(Deserialize)]
pub struct DepictParams {
    pub smiles: String,
}

/// Standalone 2D depiction endpoint.
pub async fn api_depict(Query(params): Query<DepictParams>) -> Response {
    match Molecule::parse(&params.smiles) {
        Ok(molecule) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            depict::to_svg(&molecule),
        )
            .into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}
