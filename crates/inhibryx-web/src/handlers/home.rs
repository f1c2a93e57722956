//! Home page.

use axum::extract::State;
use axum::response::Html;

use crate::handlers::page;
use crate::state::SharedState;

pub async fn home_page(State(state): State<SharedState>) -> Html<String> {
    let target_count = state.pipeline.registry().target_count();
    let body = format!(
        r#"<div class="card">
    <h1>Inhibryx — Predicting Drug Bioactivity</h1>
    <p>Inhibryx predicts pIC50 values for inhibitors of human protein targets from
    pretrained machine-learning models. Enter a compound as a SMILES string, pick a
    target protein and a feature representation, and get back the predicted potency,
    the inhibition dose, a 2D structure rendering, and structurally similar compounds
    from ChEMBL.</p>
    <ul>
        <li><strong>Predict pIC50 values</strong> against {targets} human protein targets.</li>
        <li><strong>Descriptor and fingerprint options</strong> — physicochemical
            descriptors or 2048-bit Morgan fingerprints as the model input.</li>
        <li><strong>2D structure visualisation</strong> for every submitted compound.</li>
        <li><strong>Similar compound identification</strong> at a minimum of 70%
            structural similarity, live from the ChEMBL database.</li>
        <li><strong>Batch mode</strong> — upload a CSV with a SMILES column and download
            the predictions.</li>
    </ul>
    <p><a href="/predict">Start with a single prediction →</a></p>
</div>"#,
        targets = target_count
    );
    Html(page("Home", &body))
}
