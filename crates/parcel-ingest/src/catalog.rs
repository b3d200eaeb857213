//! Per-source threshold catalogs loaded from TOML.
//!
//! ```toml
//! [[source]]
//! name = "assessor"
//! strict_key_fields = ["apn"]
//! tier = "moderate"          # or: fuzzy_threshold = 96
//! address_field = "situs_street"
//!
//! [source.address]
//! city = "situs_city"
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use parcel_model::{RawThresholdConfig, ThresholdConfig};
use serde::Deserialize;
use tracing::debug;

use crate::error::{IngestError, Result};

const BUILTIN_CATALOG: &str = include_str!("../sources/default.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "source")]
    sources: Vec<RawThresholdConfig>,
}

/// Named source configurations, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCatalog {
    sources: Vec<ThresholdConfig>,
}

impl SourceCatalog {
    /// Build a catalog, rejecting duplicate source names.
    pub fn new(sources: Vec<ThresholdConfig>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for source in &sources {
            if !names.insert(source.source()) {
                return Err(IngestError::DuplicateSource {
                    name: source.source().to_string(),
                });
            }
        }
        Ok(Self { sources })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_CATALOG, "<builtin>")
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&text, &path.display().to_string())?;
        debug!(
            path = %path.display(),
            sources = catalog.sources.len(),
            "source catalog loaded"
        );
        Ok(catalog)
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text).map_err(|err| IngestError::CatalogParse {
            origin: origin.to_string(),
            message: err.to_string(),
        })?;
        let sources = file
            .sources
            .into_iter()
            .map(|raw| {
                let name = raw.source.clone();
                ThresholdConfig::try_from(raw)
                    .map_err(|source| IngestError::InvalidSource { name, source })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(sources)
    }

    pub fn get(&self, name: &str) -> Result<&ThresholdConfig> {
        self.sources
            .iter()
            .find(|source| source.source() == name)
            .ok_or_else(|| IngestError::UnknownSource {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(ThresholdConfig::source).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThresholdConfig> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
