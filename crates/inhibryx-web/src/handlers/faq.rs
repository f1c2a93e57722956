//! FAQ page.

use axum::response::Html;

use crate::handlers::page;

pub async fn faq_page() -> Html<String> {
    let body = r#"<div class="card">
    <h1>FAQ</h1>
    <h2>What is a pIC50 value?</h2>
    <p>The negative base-10 logarithm of the half-maximal inhibitory concentration
    (IC50). Higher pIC50 means greater potency: a compound with pIC50 7 inhibits its
    target at a ten times lower concentration than one with pIC50 6.</p>

    <h2>What is a SMILES string?</h2>
    <p>A line notation encoding a chemical structure, e.g.
    <span class="mono">CC(=O)Oc1ccccc1C(=O)O</span> for aspirin. Counter-ion
    fragments (<span class="mono">.[Na+]</span> and the like) are stripped before
    feature computation.</p>

    <h2>Descriptors or fingerprints — which should I choose?</h2>
    <p>Descriptors are named physicochemical properties (molecular weight, TPSA,
    logP, ...); fingerprints are 2048 binary features encoding circular substructures
    (Morgan, radius 2). Both representations have a separately trained model per
    target; neither is universally better. If in doubt, try both.</p>

    <h2>What does the inhibition dose mean?</h2>
    <p>The mass of compound, in mg, whose dissolution in one litre reaches the
    predicted half-maximal inhibitory concentration. It is derived deterministically
    from the predicted pIC50 and the molecular weight.</p>

    <h2>Where do the similar compounds come from?</h2>
    <p>From a live ChEMBL similarity search at a 70% threshold. If ChEMBL is
    unreachable the prediction still completes; only the similarity table is
    replaced by a notice.</p>

    <h2>Why was my whole batch file rejected?</h2>
    <p>Batch mode is all-or-nothing: the file must have a <span class="mono">SMILES</span>
    column with that exact header, and every row must hold valid SMILES notation.
    The error message names the first offending row.</p>
</div>"#;
    Html(page("FAQ", body))
}
