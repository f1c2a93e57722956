//! ChEMBL similarity client.
//!
//! Queries the ChEMBL REST similarity resource for compounds at least
//! `threshold` percent structurally similar to a query SMILES.
//!
//! API docs: https://chembl.gitbook.io/chembl-interface-documentation/web-resources/chembl-api
//! Endpoint: GET {base}/similarity/{smiles}/{threshold}.json
//!
//! Failures here are always soft: the caller shows a notice instead of
//! the similar-compound table and keeps the prediction.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use inhibryx_common::config::ChemblConfig;
use inhibryx_common::sandbox::SandboxClient;
use inhibryx_common::{InhibryxError, Result};

/// A compound returned by the similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarCompound {
    pub chembl_id: String,
    pub name: Option<String>,
    /// Structural similarity to the query, in percent.
    pub similarity: f64,
    /// Canonical SMILES from the nested structure record; absent when
    /// ChEMBL holds no structure for the compound.
    pub canonical_smiles: Option<String>,
}

#[derive(Deserialize)]
struct SimilarityResponse {
    #[serde(default)]
    molecules: Vec<SimilarityRecord>,
}

#[derive(Deserialize)]
struct SimilarityRecord {
    molecule_chembl_id: Option<String>,
    pref_name: Option<String>,
    // ChEMBL serialises similarity as a decimal string.
    similarity: Option<serde_json::Value>,
    molecule_structures: Option<MoleculeStructures>,
}

#[derive(Deserialize)]
struct MoleculeStructures {
    canonical_smiles: Option<String>,
}

/// Client for ChEMBL compound similarity lookups.
#[derive(Debug, Clone)]
pub struct ChemblClient {
    client: SandboxClient,
    base_url: String,
    threshold: u8,
}

impl ChemblClient {
    pub fn new(config: &ChemblConfig) -> Result<Self> {
        let client = SandboxClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            threshold: config.similarity_threshold,
        })
    }

    /// Find compounds at least `threshold` percent similar to `smiles`.
    /// Every failure mode maps to `ExternalService`.
    #[instrument(skip(self))]
    pub async fn find_similar(&self, smiles: &str) -> Result<Vec<SimilarCompound>> {
        let url = self.similarity_url(smiles)?;
        debug!(url = %url, "Querying ChEMBL similarity");

        let resp = self
            .client
            .get(url.as_str())?
            .send()
            .await
            .map_err(|e| InhibryxError::ExternalService(format!("ChEMBL request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(InhibryxError::ExternalService(format!(
                "ChEMBL returned HTTP {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| InhibryxError::ExternalService(format!("ChEMBL response unreadable: {}", e)))?;

        parse_response(body)
    }

    /// Build `{base}/similarity/{smiles}/{threshold}.json` with the
    /// SMILES percent-encoded as a path segment.
    fn similarity_url(&self, smiles: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| InhibryxError::Config(format!("invalid ChEMBL base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| InhibryxError::Config("ChEMBL base URL cannot hold a path".to_string()))?
            .push("similarity")
            .push(smiles)
            .push(&format!("{}.json", self.threshold));
        Ok(url)
    }
}

/// Flatten the raw nested response into `SimilarCompound` records.
/// Records without structure data get a `None` canonical SMILES rather
/// than being dropped.
fn parse_response(body: serde_json::Value) -> Result<Vec<SimilarCompound>> {
    let response: SimilarityResponse = serde_json::from_value(body)
        .map_err(|e| InhibryxError::ExternalService(format!("unexpected ChEMBL payload: {}", e)))?;

    Ok(response
        .molecules
        .into_iter()
        .filter_map(|record| {
            let chembl_id = record.molecule_chembl_id?;
            let similarity = record.similarity.as_ref().and_then(parse_similarity)?;
            Some(SimilarCompound {
                chembl_id,
                name: record.pref_name,
                similarity,
                canonical_smiles: record
                    .molecule_structures
                    .and_then(|s| s.canonical_smiles),
            })
        })
        .collect())
}

fn parse_similarity(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_response() {
        let body = json!({
            "molecules": [
                {
                    "molecule_chembl_id": "CHEMBL25",
                    "pref_name": "ASPIRIN",
                    "similarity": "85.71",
                    "molecule_structures": {
                        "canonical_smiles": "CC(=O)Oc1ccccc1C(=O)O"
                    }
                },
                {
                    "molecule_chembl_id": "CHEMBL1234",
                    "pref_name": null,
                    "similarity": 70.0,
                    "molecule_structures": null
                }
            ],
            "page_meta": {"total_count": 2}
        });

        let compounds = parse_response(body).unwrap();
        assert_eq!(compounds.len(), 2);
        assert_eq!(compounds[0].chembl_id, "CHEMBL25");
        assert_eq!(compounds[0].name.as_deref(), Some("ASPIRIN"));
        assert!((compounds[0].similarity - 85.71).abs() < 1e-9);
        assert!(compounds[0].canonical_smiles.is_some());
        // absent structure data degrades to a null canonical SMILES
        assert_eq!(compounds[1].canonical_smiles, None);
        assert_eq!(compounds[1].name, None);
    }

    #[test]
    fn test_parse_empty_molecule_list() {
        let compounds = parse_response(json!({"molecules": [], "page_meta": null})).unwrap();
        assert!(compounds.is_empty());
    }

    #[test]
    fn test_parse_missing_molecules_key() {
        let compounds = parse_response(json!({"page_meta": null})).unwrap();
        assert!(compounds.is_empty());
    }

    #[test]
    fn test_garbage_payload_is_external_service_error() {
        let err = parse_response(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, InhibryxError::ExternalService(_)));
    }

    #[test]
    fn test_similarity_url_encodes_smiles() {
        let config = ChemblConfig::default();
        let client = ChemblClient::new(&config).unwrap();
        let url = client.similarity_url("CC(=O)[O-]").unwrap();
        let s = url.as_str();
        assert!(s.starts_with("https://www.ebi.ac.uk/chembl/api/data/similarity/"));
        assert!(s.ends_with("/70.json"));
        // the SMILES travels as a single path segment
        assert_eq!(url.path_segments().unwrap().count(), 6);
    }
}
