//! The live color and variant indexes for one catalog source.
//!
//! Both indexes are built together into a [`Snapshot`] and published with a
//! single pointer swap, so a reader holding a snapshot never sees a mix of old
//! and new data. A catalog that fails to load publishes an empty snapshot; it
//! stays searchable and every query comes back empty.

use arc_swap::ArcSwap;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{CatalogSource, LoadError, LoadedCatalog};
use crate::colors::ColorIndex;
use crate::model::{Color, Variant};
use crate::resolve::ColorResolver;
use crate::variants::VariantIndex;

#[derive(Debug, Default)]
pub struct Snapshot {
    pub colors: ColorIndex,
    pub variants: VariantIndex,
    pub producers: usize,
    pub digest: Option<String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(loaded: &LoadedCatalog) -> Self {
        Self {
            colors: ColorIndex::rebuild(&loaded.catalog),
            variants: VariantIndex::rebuild(&loaded.catalog),
            producers: loaded.catalog.producers.len(),
            digest: Some(loaded.digest.clone()),
        }
    }

    pub fn resolver(&self) -> ColorResolver<'_> {
        ColorResolver::new(&self.colors)
    }

    pub fn is_degraded(&self) -> bool {
        self.digest.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReloadOutcome {
    Loaded {
        colors: usize,
        variants: usize,
        changed: bool,
    },
    Degraded {
        error: String,
    },
}

#[derive(Debug)]
pub struct CatalogCache {
    source: CatalogSource,
    current: ArcSwap<Snapshot>,
}

impl CatalogCache {
    pub fn open(source: CatalogSource) -> Self {
        let snapshot = match load_snapshot(&source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(source = %source.describe(), error = %e, "catalog unavailable, starting empty");
                Snapshot::empty()
            }
        };
        Self {
            source,
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// The currently published indexes. Stays valid across later reloads.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Re-reads the source and replaces both indexes at once.
    pub fn reload(&self) -> ReloadOutcome {
        match load_snapshot(&self.source) {
            Ok(snapshot) => {
                let previous = self.current.load();
                let changed = previous.digest != snapshot.digest;
                let outcome = ReloadOutcome::Loaded {
                    colors: snapshot.colors.len(),
                    variants: snapshot.variants.len(),
                    changed,
                };
                tracing::info!(
                    source = %self.source.describe(),
                    colors = snapshot.colors.len(),
                    variants = snapshot.variants.len(),
                    digest = snapshot.digest.as_deref().unwrap_or_default(),
                    changed,
                    "catalog reloaded"
                );
                self.current.store(Arc::new(snapshot));
                outcome
            }
            Err(e) => {
                tracing::warn!(source = %self.source.describe(), error = %e, "catalog reload failed, index emptied");
                self.current.store(Arc::new(Snapshot::empty()));
                ReloadOutcome::Degraded {
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn search_colors(&self, query: &str) -> Vec<Color> {
        cloned(self.snapshot().colors.search(query))
    }

    pub fn search_variants(&self, query: &str) -> Vec<Variant> {
        cloned(self.snapshot().variants.search(query))
    }

    pub fn color_by_id(&self, id: &str) -> Option<Color> {
        self.snapshot().colors.get_by_id(id).cloned()
    }

    pub fn colors_by_company_id(&self, company_id: &str) -> Vec<Color> {
        cloned(self.snapshot().colors.get_by_company_id(company_id))
    }

    pub fn variants_by_number(&self, number: &str) -> Vec<Variant> {
        cloned(self.snapshot().variants.get_by_number(number))
    }

    pub fn all_colors(&self) -> Vec<Color> {
        self.snapshot().colors.get_all()
    }

    pub fn all_variants(&self) -> Vec<Variant> {
        self.snapshot().variants.get_all()
    }

    pub fn stats(&self) -> CatalogStats {
        let snapshot = self.snapshot();
        CatalogStats {
            source: self.source.describe(),
            producers: snapshot.producers,
            colors: snapshot.colors.len(),
            variants: snapshot.variants.len(),
            digest: snapshot.digest.clone(),
            degraded: snapshot.is_degraded(),
        }
    }
}

fn load_snapshot(source: &CatalogSource) -> Result<Snapshot, LoadError> {
    let loaded = source.load()?;
    Ok(Snapshot::build(&loaded))
}

fn cloned<T: Clone>(records: Vec<&T>) -> Vec<T> {
    records.into_iter().cloned().collect()
}

#[derive(Debug, Serialize)]
pub struct CatalogStats {
    pub source: String,
    pub producers: usize,
    pub colors: usize,
    pub variants: usize,
    pub digest: Option<String>,
    pub degraded: bool,
}
