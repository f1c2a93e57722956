//! End-to-end pipeline tests over a temporary on-disk model catalog.

use std::io::Write;
use std::sync::Arc;

use inhibryx_chem::ChemblClient;
use inhibryx_common::config::ChemblConfig;
use inhibryx_common::InhibryxError;
use inhibryx_models::{FeatureMethod, PredictionPipeline, Registry};

/// Catalog with one fingerprint model and one descriptor model.
fn build_catalog() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();

    let fp = dir.path().join("Acetylcholinesterase").join("fingerprints");
    std::fs::create_dir_all(&fp).unwrap();
    write(&fp, "selected_features.json", r#"["Morgan_1", "Morgan_2", "Morgan_3"]"#);
    write(
        &fp,
        "model.json",
        r#"{"kind":"linear","coefficients":[0.3,0.2,0.1],"intercept":5.5}"#,
    );

    let desc = dir.path().join("Acetylcholinesterase").join("descriptors");
    std::fs::create_dir_all(&desc).unwrap();
    write(&desc, "selected_features.json", r#"["TPSA", "MolWt"]"#);
    write(
        &desc,
        "preprocessor.json",
        r#"{"columns":[
            {"name":"MolWt","median":250.0,"mean":250.0,"std":120.0},
            {"name":"TPSA","median":60.0,"mean":60.0,"std":35.0}
        ]}"#,
    );
    write(&desc, "model.json", r#"{"kind":"linear","coefficients":[0.8,-0.4],"intercept":6.2}"#);

    dir
}

fn write(dir: &std::path::Path, name: &str, contents: &str) {
    std::fs::File::create(dir.join(name))
        .unwrap()
        .write_all(contents.as_bytes())
        .unwrap();
}

/// A ChEMBL client whose base URL the sandbox refuses, so enrichment
/// degrades instantly without touching the network.
fn offline_chembl() -> ChemblClient {
    let config = ChemblConfig {
        base_url: "https://chembl.unreachable.invalid/api/data".to_string(),
        ..ChemblConfig::default()
    };
    ChemblClient::new(&config).unwrap()
}

fn build_pipeline(dir: &tempfile::TempDir) -> PredictionPipeline {
    let registry = Arc::new(Registry::scan(dir.path()).unwrap());
    PredictionPipeline::new(registry, offline_chembl())
}

#[tokio::test]
async fn prediction_survives_similarity_outage() {
    let dir = build_catalog();
    let pipeline = build_pipeline(&dir);

    let outcome = pipeline
        .predict("CCO", "Acetylcholinesterase", FeatureMethod::Fingerprints)
        .await
        .unwrap();

    // the numeric prediction is intact, only the similarity section degraded
    assert!(outcome.pic50.is_finite());
    assert!(outcome.inhibition_dose_mg > 0.0);
    assert!(outcome.depiction_svg.as_deref().unwrap().starts_with("<svg"));
    assert!(outcome.similar_compounds.is_none());
    assert!(outcome.similarity_notice.is_some());
}

#[tokio::test]
async fn invalid_smiles_halts_before_features() {
    let dir = build_catalog();
    let pipeline = build_pipeline(&dir);

    let err = pipeline
        .predict("C1CC", "Acetylcholinesterase", FeatureMethod::Fingerprints)
        .await
        .unwrap_err();
    assert!(matches!(err, InhibryxError::InvalidInput(_)));
    // nothing was loaded for a request that never validated
    assert_eq!(pipeline.registry().cached_bundles(), 0);
}

#[tokio::test]
async fn descriptor_and_fingerprint_paths_both_predict() {
    let dir = build_catalog();
    let pipeline = build_pipeline(&dir);

    let fp = pipeline
        .predict("CC(=O)Oc1ccccc1C(=O)O", "Acetylcholinesterase", FeatureMethod::Fingerprints)
        .await
        .unwrap();
    let desc = pipeline
        .predict("CC(=O)Oc1ccccc1C(=O)O", "Acetylcholinesterase", FeatureMethod::Descriptors)
        .await
        .unwrap();

    assert!(fp.pic50.is_finite());
    assert!(desc.pic50.is_finite());
    // two bundles now cached, one per method
    assert_eq!(pipeline.registry().cached_bundles(), 2);
}

#[tokio::test]
async fn repeated_loads_share_one_bundle_and_agree() {
    let dir = build_catalog();
    let pipeline = build_pipeline(&dir);

    let first = pipeline
        .predict("c1ccccc1O", "Acetylcholinesterase", FeatureMethod::Descriptors)
        .await
        .unwrap();
    let second = pipeline
        .predict("c1ccccc1O", "Acetylcholinesterase", FeatureMethod::Descriptors)
        .await
        .unwrap();

    assert_eq!(first.pic50, second.pic50);
    assert_eq!(pipeline.registry().cached_bundles(), 1);
}

#[tokio::test]
async fn unknown_pair_is_a_configuration_error() {
    let dir = build_catalog();
    let pipeline = build_pipeline(&dir);

    let err = pipeline
        .predict("CCO", "Monoamine oxidase", FeatureMethod::Descriptors)
        .await
        .unwrap_err();
    assert!(matches!(err, InhibryxError::ArtifactLoad(_)));
}
