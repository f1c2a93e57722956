//! The on-disk model catalog and its process-lifetime cache.
//!
//! Layout: `models/<target_protein>/<method>/` where `<method>` is
//! `descriptors` or `fingerprints`, containing:
//!   - `selected_features.json` — ordered training-time column names
//!   - `preprocessor.json`      — descriptors method only
//!   - `model/` or `model.json` — the predictor (see `predictor`)
//!
//! The catalog is listed once at startup into an immutable registry.
//! Bundles load lazily and are cached by path for the life of the
//! process; artifacts never change after deployment, so there is no
//! invalidation. Cache population is idempotent: a race costs a
//! duplicate load, never a corrupt entry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use inhibryx_common::{InhibryxError, Result};

use crate::artifacts::{load_selected_features, Preprocessor};
use crate::predictor::{load_predictor, Predictor};

/// Feature representation a model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureMethod {
    Descriptors,
    Fingerprints,
}

impl FeatureMethod {
    /// On-disk directory name.
    pub fn dir_name(self) -> &'static str {
        match self {
            FeatureMethod::Descriptors => "descriptors",
            FeatureMethod::Fingerprints => "fingerprints",
        }
    }

    /// Title-case display name for selectors.
    pub fn display_name(self) -> &'static str {
        match self {
            FeatureMethod::Descriptors => "Descriptors",
            FeatureMethod::Fingerprints => "Fingerprints",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "descriptors" => Some(FeatureMethod::Descriptors),
            "fingerprints" => Some(FeatureMethod::Fingerprints),
            _ => None,
        }
    }

    /// Parse a user-facing method string, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_dir_name(name.to_lowercase().as_str())
    }
}

impl fmt::Display for FeatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Everything needed to predict for one (target, method) pair.
#[derive(Debug)]
pub struct ModelBundle {
    pub selected_features: Vec<String>,
    /// Present for the descriptors method only.
    pub preprocessor: Option<Preprocessor>,
    pub predictor: Box<dyn Predictor>,
}

/// Immutable catalog plus lazy bundle cache.
pub struct Registry {
    root: PathBuf,
    /// target name -> methods available on disk, targets in
    /// case-insensitive sort order.
    catalog: BTreeMap<String, Vec<FeatureMethod>>,
    cache: RwLock<HashMap<PathBuf, Arc<ModelBundle>>>,
}

impl Registry {
    /// Scan the models root once. Unknown method directories are logged
    /// and skipped; a target with no recognised method is dropped.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(InhibryxError::ArtifactLoad(format!(
                "models root {} is not a directory",
                root.display()
            )));
        }

        let mut catalog = BTreeMap::new();
        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let target = entry.file_name().to_string_lossy().to_string();

            let mut methods = Vec::new();
            for sub in std::fs::read_dir(entry.path())? {
                let sub = sub?;
                if !sub.path().is_dir() {
                    continue;
                }
                let name = sub.file_name().to_string_lossy().to_string();
                match FeatureMethod::from_dir_name(&name) {
                    Some(method) => methods.push(method),
                    None => {
                        warn!(target = %target, dir = %name, "Unrecognised method directory, skipping");
                    }
                }
            }
            if methods.is_empty() {
                warn!(target = %target, "Target has no model method directories, skipping");
                continue;
            }
            methods.sort_unstable();
            catalog.insert(target, methods);
        }

        info!(
            root = %root.display(),
            targets = catalog.len(),
            "Model catalog loaded"
        );
        Ok(Self { root, catalog, cache: RwLock::new(HashMap::new()) })
    }

    /// Target names, sorted case-insensitively for the selector.
    pub fn targets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalog.keys().cloned().collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Methods available for a target.
    pub fn methods(&self, target: &str) -> Option<&[FeatureMethod]> {
        self.catalog.get(target).map(|m| m.as_slice())
    }

    pub fn target_count(&self) -> usize {
        self.catalog.len()
    }

    fn bundle_dir(&self, target: &str, method: FeatureMethod) -> Result<PathBuf> {
        let known = self
            .catalog
            .get(target)
            .ok_or_else(|| {
                InhibryxError::ArtifactLoad(format!("unknown target protein {:?}", target))
            })?;
        if !known.contains(&method) {
            return Err(InhibryxError::ArtifactLoad(format!(
                "target {:?} has no {} model",
                target,
                method.dir_name()
            )));
        }
        Ok(self.root.join(target).join(method.dir_name()))
    }

    /// Resolve and load the bundle for a (target, method) pair.
    /// At most one load per path per process; later callers share the
    /// cached bundle.
    pub fn bundle(&self, target: &str, method: FeatureMethod) -> Result<Arc<ModelBundle>> {
        let dir = self.bundle_dir(target, method)?;

        if let Some(bundle) = self.cache.read().expect("cache lock poisoned").get(&dir) {
            return Ok(bundle.clone());
        }

        debug!(path = %dir.display(), "Loading model bundle");
        let selected_features = load_selected_features(&dir.join("selected_features.json"))?;
        let preprocessor = match method {
            FeatureMethod::Descriptors => Some(Preprocessor::load(&dir.join("preprocessor.json"))?),
            FeatureMethod::Fingerprints => None,
        };
        let predictor = load_predictor(&dir)?;

        let bundle = Arc::new(ModelBundle { selected_features, preprocessor, predictor });
        let mut cache = self.cache.write().expect("cache lock poisoned");
        // A racing loader may have beaten us; keep the first entry so
        // every caller shares one bundle.
        let entry = cache.entry(dir).or_insert_with(|| bundle.clone());
        Ok(entry.clone())
    }

    /// Number of bundles currently cached.
    pub fn cached_bundles(&self) -> usize {
        self.cache.read().expect("cache lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build a minimal on-disk catalog with one linear model.
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let fp_dir = dir.path().join("Acetylcholinesterase").join("fingerprints");
        std::fs::create_dir_all(&fp_dir).unwrap();
        std::fs::File::create(fp_dir.join("selected_features.json"))
            .unwrap()
            .write_all(br#"["Morgan_1", "Morgan_7"]"#)
            .unwrap();
        std::fs::File::create(fp_dir.join("model.json"))
            .unwrap()
            .write_all(br#"{"kind":"linear","coefficients":[1.0,2.0],"intercept":4.0}"#)
            .unwrap();

        let desc_dir = dir.path().join("Monoamine oxidase").join("descriptors");
        std::fs::create_dir_all(&desc_dir).unwrap();
        std::fs::File::create(desc_dir.join("selected_features.json"))
            .unwrap()
            .write_all(br#"["MolWt"]"#)
            .unwrap();
        std::fs::File::create(desc_dir.join("preprocessor.json"))
            .unwrap()
            .write_all(br#"{"columns":[{"name":"MolWt","median":300.0,"mean":300.0,"std":100.0}]}"#)
            .unwrap();
        std::fs::File::create(desc_dir.join("model.json"))
            .unwrap()
            .write_all(br#"{"kind":"linear","coefficients":[0.5],"intercept":6.0}"#)
            .unwrap();

        dir
    }

    #[test]
    fn test_scan_builds_catalog() {
        let dir = fixture();
        let registry = Registry::scan(dir.path()).unwrap();
        assert_eq!(registry.target_count(), 2);
        assert_eq!(
            registry.methods("Acetylcholinesterase").unwrap(),
            &[FeatureMethod::Fingerprints]
        );
        assert_eq!(
            registry.methods("Monoamine oxidase").unwrap(),
            &[FeatureMethod::Descriptors]
        );
    }

    #[test]
    fn test_targets_sorted_case_insensitively() {
        let dir = fixture();
        let extra = dir.path().join("aaa target").join("fingerprints");
        std::fs::create_dir_all(&extra).unwrap();
        std::fs::File::create(extra.join("selected_features.json"))
            .unwrap()
            .write_all(br#"["Morgan_1"]"#)
            .unwrap();
        std::fs::File::create(extra.join("model.json"))
            .unwrap()
            .write_all(br#"{"kind":"linear","coefficients":[1.0],"intercept":0.0}"#)
            .unwrap();

        let registry = Registry::scan(dir.path()).unwrap();
        let targets = registry.targets();
        assert_eq!(targets[0], "aaa target");
        assert_eq!(targets[1], "Acetylcholinesterase");
    }

    #[test]
    fn test_unknown_target_is_artifact_error() {
        let dir = fixture();
        let registry = Registry::scan(dir.path()).unwrap();
        assert!(matches!(
            registry.bundle("Nope", FeatureMethod::Descriptors).unwrap_err(),
            InhibryxError::ArtifactLoad(_)
        ));
    }

    #[test]
    fn test_missing_method_is_artifact_error() {
        let dir = fixture();
        let registry = Registry::scan(dir.path()).unwrap();
        assert!(registry
            .bundle("Acetylcholinesterase", FeatureMethod::Descriptors)
            .is_err());
    }

    #[test]
    fn test_bundle_loaded_once_and_shared() {
        let dir = fixture();
        let registry = Registry::scan(dir.path()).unwrap();
        let first = registry
            .bundle("Acetylcholinesterase", FeatureMethod::Fingerprints)
            .unwrap();
        let second = registry
            .bundle("Acetylcholinesterase", FeatureMethod::Fingerprints)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.cached_bundles(), 1);
    }

    #[test]
    fn test_descriptors_bundle_carries_preprocessor() {
        let dir = fixture();
        let registry = Registry::scan(dir.path()).unwrap();
        let bundle = registry
            .bundle("Monoamine oxidase", FeatureMethod::Descriptors)
            .unwrap();
        assert!(bundle.preprocessor.is_some());
        assert_eq!(bundle.selected_features, vec!["MolWt".to_string()]);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(FeatureMethod::parse("Descriptors"), Some(FeatureMethod::Descriptors));
        assert_eq!(FeatureMethod::parse("fingerprints"), Some(FeatureMethod::Fingerprints));
        assert_eq!(FeatureMethod::parse("magic"), None);
    }
}
