//! Application configuration.
//!
//! Loaded from `inhibryx.toml` if present, with environment variable
//! overrides for deployment-specific values. All sections default so an
//! empty file (or none at all) yields a runnable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InhibryxError, Result};

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the on-disk model catalog (`models/<target>/<method>/`).
    #[serde(default = "default_models_root")]
    pub models_root: PathBuf,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chembl: ChemblConfig,

    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemblConfig {
    /// Base URL of the ChEMBL REST API.
    #[serde(default = "default_chembl_url")]
    pub base_url: String,
    /// Minimum structural similarity, in percent, for the similar-compound query.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Upper bound on accepted SMILES length.
    #[serde(default = "default_max_smiles_len")]
    pub max_smiles_len: usize,
}

fn default_models_root() -> PathBuf {
    PathBuf::from("models")
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_chembl_url() -> String {
    "https://www.ebi.ac.uk/chembl/api/data".to_string()
}
fn default_similarity_threshold() -> u8 {
    70
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_smiles_len() -> usize {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for ChemblConfig {
    fn default() -> Self {
        Self {
            base_url: default_chembl_url(),
            similarity_threshold: default_similarity_threshold(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_smiles_len: default_max_smiles_len() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models_root: default_models_root(),
            server: ServerConfig::default(),
            chembl: ChemblConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: `inhibryx.toml` if it exists, then environment
    /// overrides (`INHIBRYX_MODELS_ROOT`, `INHIBRYX_HOST`, `INHIBRYX_PORT`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = if path.as_ref().exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)
                .map_err(|e| InhibryxError::Config(format!("invalid config file: {}", e)))?
        } else {
            AppConfig::default()
        };

        if let Ok(root) = std::env::var("INHIBRYX_MODELS_ROOT") {
            config.models_root = PathBuf::from(root);
        }
        if let Ok(host) = std::env::var("INHIBRYX_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("INHIBRYX_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| InhibryxError::Config(format!("invalid INHIBRYX_PORT: {}", port)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_runnable() {
        let config = AppConfig::default();
        assert_eq!(config.chembl.similarity_threshold, 70);
        assert_eq!(config.input.max_smiles_len, 5000);
        assert_eq!(config.models_root, PathBuf::from("models"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            models_root = "/srv/models"

            [chembl]
            similarity_threshold = 85
            "#,
        )
        .unwrap();
        assert_eq!(config.models_root, PathBuf::from("/srv/models"));
        assert_eq!(config.chembl.similarity_threshold, 85);
        // untouched sections keep their defaults
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.chembl.base_url, default_chembl_url());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("/nonexistent/inhibryx.toml").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
