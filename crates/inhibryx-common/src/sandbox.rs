use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use url::Url;

use crate::error::InhibryxError;

/// A sandbox-capped HTTP client that only allows requests to approved domains.
/// All outbound scientific API traffic goes through this wrapper.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a new SandboxClient with the default allowlist of remote
    /// chemistry services.
    pub fn new(timeout: Duration) -> Result<Self, InhibryxError> {
        let mut allowlist = HashSet::new();
        let domains = vec![
            "www.ebi.ac.uk", // ChEMBL
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| InhibryxError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, InhibryxError> {
        if !self.is_allowed(url) {
            return Err(InhibryxError::Sandbox(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SandboxClient {
        SandboxClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_chembl_domain_allowed() {
        assert!(client().is_allowed("https://www.ebi.ac.uk/chembl/api/data/similarity/CCO/70.json"));
    }

    #[test]
    fn test_unknown_domain_blocked() {
        let c = client();
        assert!(!c.is_allowed("https://example.com/anything"));
        assert!(c.get("https://example.com/anything").is_err());
    }

    #[test]
    fn test_allow_domain_extends_policy() {
        let mut c = client();
        assert!(!c.is_allowed("http://localhost:8080/mock"));
        c.allow_domain("localhost");
        assert!(c.is_allowed("http://localhost:8080/mock"));
    }
}
