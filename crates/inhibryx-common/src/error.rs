use thiserror::Error;

#[derive(Debug, Error)]
pub enum InhibryxError {
    /// SMILES input the parser cannot interpret. Recoverable by the user.
    #[error("Invalid SMILES: {0}")]
    InvalidInput(String),

    /// Batch file lacks the required column. The whole file is rejected.
    #[error("Missing required column {0:?} in uploaded file")]
    MissingColumn(String),

    /// A model, feature list, or preprocessor file is absent or corrupt
    /// for a (target, method) pair. Deployment problem, not retried.
    #[error("Model artifact unavailable: {0}")]
    ArtifactLoad(String),

    /// Computed feature set does not contain every selected feature.
    /// Indicates artifact/version skew between training and serving.
    #[error("Feature set mismatch: missing {0:?}")]
    FeatureMismatch(Vec<String>),

    /// Similarity lookup failed or timed out. Degrades gracefully.
    #[error("External service unavailable: {0}")]
    ExternalService(String),

    #[error("Request to non-allowlisted domain blocked: {0}")]
    Sandbox(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InhibryxError {
    /// Whether this error leaves an already-computed prediction intact.
    /// Only similarity/enrichment failures are soft; everything else
    /// aborts the pipeline.
    pub fn is_soft(&self) -> bool {
        matches!(self, InhibryxError::ExternalService(_))
    }
}

pub type Result<T> = std::result::Result<T, InhibryxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_service_is_soft() {
        assert!(InhibryxError::ExternalService("timeout".into()).is_soft());
        assert!(!InhibryxError::InvalidInput("C(".into()).is_soft());
        assert!(!InhibryxError::ArtifactLoad("model.json".into()).is_soft());
    }

    #[test]
    fn test_feature_mismatch_lists_columns() {
        let err = InhibryxError::FeatureMismatch(vec!["TPSA".into(), "MolLogP".into()]);
        let msg = err.to_string();
        assert!(msg.contains("TPSA"));
        assert!(msg.contains("MolLogP"));
    }
}
