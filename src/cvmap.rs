//! Controlled vocabulary mapping
//!
//! Translates ODM2 vocabulary terms into their WaterML 1.1 equivalents using
//! a YAML table shaped as:
//!
//! ```yaml
//! samplemedium:
//!   Surface Water: [surfaceWater, liquidAqueous]
//! ```
//!
//! Lookups never fail: a term with no synonym entry is returned as-is.

use serde::Deserialize;
use serde_yaml::Mapping;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Vocabulary category for value data types
pub const CV_DATA_TYPE: &str = "datatype";

/// Vocabulary category for sample media
pub const CV_SAMPLE_MEDIUM: &str = "samplemedium";

/// Mapping shipped with the crate
pub const DEFAULT_CVMAP_YAML: &str = include_str!("../cvmap_wml_1_1.yml");

/// Errors that can occur while loading a CV mapping file
#[derive(Debug, thiserror::Error)]
pub enum CvMapError {
    #[error("Failed to read CV map {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse CV map: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for CvMapError {
    fn from(e: serde_yaml::Error) -> Self {
        CvMapError::Parse(e.to_string())
    }
}

/// Category → canonical terms in file order (`Mapping` keeps insertion order)
type RawCvMap = HashMap<String, Option<Mapping>>;

/// Synonyms may be written as a list or a single term
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Synonyms {
    Many(Vec<String>),
    One(String),
}

/// One canonical term and the raw terms that map onto it
#[derive(Debug, Clone, PartialEq)]
struct CvEntry {
    canonical: String,
    synonyms: Vec<String>,
}

/// Category → ordered canonical entries
#[derive(Debug, Clone, Default)]
pub struct CvMapper {
    categories: HashMap<String, Vec<CvEntry>>,
}

impl CvMapper {
    /// A mapper with no entries; every term passes through
    pub fn empty() -> Self {
        Self::default()
    }

    /// The mapping bundled with the crate
    pub fn bundled() -> Result<Self, CvMapError> {
        Self::from_yaml_str(DEFAULT_CVMAP_YAML)
    }

    /// Load a mapping file
    pub fn from_path(path: &Path) -> Result<Self, CvMapError> {
        let content = std::fs::read_to_string(path).map_err(|e| CvMapError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        let mapper = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            categories = mapper.categories.len(),
            "Loaded CV map"
        );
        Ok(mapper)
    }

    /// Parse a mapping from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CvMapError> {
        if yaml.trim().is_empty() {
            return Ok(Self::empty());
        }

        let raw: Option<RawCvMap> = serde_yaml::from_str(yaml)?;
        let mut categories = HashMap::new();
        for (category, terms) in raw.unwrap_or_default() {
            let mut entries = Vec::new();
            for (canonical, synonyms) in terms.unwrap_or_default() {
                let canonical: String = serde_yaml::from_value(canonical)?;
                let synonyms = match serde_yaml::from_value::<Option<Synonyms>>(synonyms)? {
                    Some(Synonyms::Many(list)) => list,
                    Some(Synonyms::One(term)) => vec![term],
                    None => Vec::new(),
                };
                entries.push(CvEntry {
                    canonical,
                    synonyms,
                });
            }
            categories.insert(category, entries);
        }

        Ok(Self { categories })
    }

    /// Canonical form of `term` under `category`, or `term` itself
    ///
    /// Canonical entries are scanned in file order; the first whose synonym
    /// list contains `term` wins.
    pub fn resolve(&self, category: &str, term: &str) -> String {
        self.categories
            .get(category)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|entry| entry.synonyms.iter().any(|s| s == term))
            })
            .map(|entry| entry.canonical.clone())
            .unwrap_or_else(|| term.to_string())
    }

    /// `resolve` for optional terms
    pub fn resolve_opt(&self, category: &str, term: Option<&str>) -> Option<String> {
        term.map(|t| self.resolve(category, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
samplemedium:
  Surface Water: [surfaceWater, liquidAqueous]
  Air: [air]
datatype:
  Average: [average]
"#;

    #[test]
    fn test_resolve_synonym_to_canonical() {
        let cv = CvMapper::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cv.resolve("samplemedium", "liquidAqueous"), "Surface Water");
        assert_eq!(cv.resolve("samplemedium", "surfaceWater"), "Surface Water");
        assert_eq!(cv.resolve("datatype", "average"), "Average");
    }

    #[test]
    fn test_unknown_term_passes_through() {
        let cv = CvMapper::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cv.resolve("samplemedium", "unknown"), "unknown");
        assert_eq!(cv.resolve("nosuchcategory", "air"), "air");
    }

    #[test]
    fn test_lookup_is_scoped_to_category() {
        let cv = CvMapper::from_yaml_str(SAMPLE).unwrap();
        // "average" is only a datatype synonym
        assert_eq!(cv.resolve("samplemedium", "average"), "average");
    }

    #[test]
    fn test_first_canonical_entry_wins() {
        let cv = CvMapper::from_yaml_str(
            "medium:\n  First: [shared]\n  Second: [shared, other]\n",
        )
        .unwrap();
        assert_eq!(cv.resolve("medium", "shared"), "First");
        assert_eq!(cv.resolve("medium", "other"), "Second");
    }

    #[test]
    fn test_scalar_and_null_synonyms() {
        let cv = CvMapper::from_yaml_str("cat:\n  One: single\n  Two:\n  Three: [three]\n")
            .unwrap();
        assert_eq!(cv.resolve("cat", "single"), "One");
        assert_eq!(cv.resolve("cat", "three"), "Three");
        assert_eq!(cv.resolve("cat", "Two"), "Two");
    }

    #[test]
    fn test_empty_document() {
        let cv = CvMapper::from_yaml_str("").unwrap();
        assert!(cv.categories.is_empty());
        assert_eq!(cv.resolve("datatype", "average"), "average");
    }

    #[test]
    fn test_rejects_non_mapping_root() {
        let err = CvMapper::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, CvMapError::Parse(_)));

        let err = CvMapper::from_yaml_str("cat:\n  One: {nested: map}\n").unwrap_err();
        assert!(matches!(err, CvMapError::Parse(_)));
    }

    #[test]
    fn test_bundled_mapping() {
        let cv = CvMapper::bundled().unwrap();
        assert_eq!(cv.resolve(CV_SAMPLE_MEDIUM, "liquidAqueous"), "Surface Water");
        assert_eq!(cv.resolve(CV_DATA_TYPE, "average"), "Average");
        assert_eq!(cv.resolve(CV_DATA_TYPE, "Average"), "Average");
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cvmap.yml");
        std::fs::write(&path, SAMPLE).unwrap();

        let cv = CvMapper::from_path(&path).unwrap();
        assert_eq!(cv.categories.len(), 2);
        assert_eq!(cv.resolve("samplemedium", "air"), "Air");

        let missing = CvMapper::from_path(&dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(missing, CvMapError::Io { .. }));
    }

    #[test]
    fn test_resolve_opt() {
        let cv = CvMapper::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cv.resolve_opt("datatype", None), None);
        assert_eq!(
            cv.resolve_opt("datatype", Some("average")),
            Some("Average".to_string())
        );
    }
}
