//! Catalog document loading.
//!
//! The document is a JSON object with a `producers` map (alias `companies`)
//! and an optional `indexes` block of precomputed lookups. The `indexes` block
//! is parsed leniently into [`AccelerationHints`]; a broken hint never fails a
//! load.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::model::Producer;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub producers: IndexMap<String, Producer>,
    pub hints: AccelerationHints,
}

impl Catalog {
    pub fn producers(&self) -> impl Iterator<Item = &Producer> {
        self.producers.values()
    }
}

#[derive(Deserialize)]
struct Document {
    #[serde(alias = "companies")]
    producers: IndexMap<String, Producer>,
    #[serde(default)]
    indexes: Option<Value>,
}

/// Precomputed lookups shipped with the document.
///
/// Advisory only: every id named here must be confirmed against the built
/// index before it is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccelerationHints {
    pub ids: HashSet<String>,
    pub company_ids: HashMap<String, Vec<String>>,
}

impl AccelerationHints {
    fn from_value(value: &Value) -> Self {
        let ids = value
            .get("byId")
            .and_then(Value::as_object)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();

        let company_ids = value
            .get("byCompanyId")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .map(|(code, ids)| {
                        let ids = ids
                            .as_array()
                            .map(|a| {
                                a.iter()
                                    .filter_map(Value::as_str)
                                    .map(str::to_string)
                                    .collect()
                            })
                            .unwrap_or_default();
                        (code.clone(), ids)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { ids, company_ids }
    }
}

/// Where the catalog document comes from. `reload` re-reads the same source.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    File(PathBuf),
    Memory(Arc<str>),
}

impl CatalogSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn memory(document: impl Into<Arc<str>>) -> Self {
        Self::Memory(document.into())
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.to_string_lossy().to_string(),
            Self::Memory(_) => "<memory>".to_string(),
        }
    }

    pub fn load(&self) -> Result<LoadedCatalog, LoadError> {
        match self {
            Self::File(path) => load_catalog(path),
            Self::Memory(document) => {
                let catalog = parse_catalog(document)?;
                Ok(LoadedCatalog {
                    catalog,
                    digest: hash_content(document),
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub digest: String,
}

pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, LoadError> {
    let document = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&document)?;
    Ok(LoadedCatalog {
        catalog,
        digest: hash_content(&document),
    })
}

pub fn parse_catalog(document: &str) -> Result<Catalog, LoadError> {
    let Document {
        mut producers,
        indexes,
    } = serde_json::from_str(document)?;

    for (key, producer) in producers.iter_mut() {
        if producer.id.is_empty() {
            producer.id = key.clone();
        }
        if producer.name.is_empty() {
            producer.name = producer.id.clone();
        }
    }

    let hints = indexes
        .as_ref()
        .map(AccelerationHints::from_value)
        .unwrap_or_default();

    Ok(Catalog { producers, hints })
}

pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
