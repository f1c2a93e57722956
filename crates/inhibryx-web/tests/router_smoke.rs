//! Router smoke tests: every route answers, without a network.

use std::io::Write;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use inhibryx_common::AppConfig;
use inhibryx_web::router::build_router;
use inhibryx_web::state::AppState;

/// State over a throwaway catalog, with ChEMBL pointed at a host the
/// sandbox refuses so enrichment degrades without network traffic.
fn build_state(dir: &tempfile::TempDir) -> AppState {
    let fp = dir.path().join("Acetylcholinesterase").join("fingerprints");
    std::fs::create_dir_all(&fp).unwrap();
    std::fs::File::create(fp.join("selected_features.json"))
        .unwrap()
        .write_all(br#"["Morgan_1", "Morgan_2"]"#)
        .unwrap();
    std::fs::File::create(fp.join("model.json"))
        .unwrap()
        .write_all(br#"{"kind":"linear","coefficients":[0.4,0.6],"intercept":5.0}"#)
        .unwrap();

    let mut config = AppConfig::default();
    config.models_root = dir.path().to_path_buf();
    config.chembl.base_url = "https://chembl.unreachable.invalid/api/data".to_string();
    AppState::new(config).unwrap()
}

#[tokio::test]
async fn pages_render() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    for path in ["/", "/predict", "/batch", "/faq"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {} failed", path);
    }
}

#[tokio::test]
async fn api_targets_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let response = app
        .oneshot(Request::builder().uri("/api/targets").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_target_methods_unknown_target_404s() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/targets/Nope/methods")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_depict_returns_svg() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/depict?smiles=CCO")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
}

#[tokio::test]
async fn api_depict_rejects_bad_smiles() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/depict?smiles=C%28")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_batch_returns_csv() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict/batch?target=Acetylcholinesterase&method=Fingerprints")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from("SMILES\nCCO\nc1ccccc1\n"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/csv");
}

#[tokio::test]
async fn api_batch_rejects_invalid_row() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict/batch?target=Acetylcholinesterase&method=Fingerprints")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from("SMILES\nCCO\nnot~smiles\n"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn api_predict_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(build_state(&dir));

    let payload = serde_json::json!({
        "smiles": "CCO",
        "target": "Acetylcholinesterase",
        "method": "Fingerprints"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
