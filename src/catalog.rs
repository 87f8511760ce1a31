/*!
 * Episode catalog.
 *
 * The catalog is a JSON array of categories, each holding subcategories with
 * `episodes` and `sub_series` title lists. Both lists are flattened into one
 * sequence of `CatalogEntry` values in traversal order.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

/// One narratable unit of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub category: String,
    pub subcategory: String,
}

/// A subcategory with its episode and sub-series titles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub episodes: Vec<String>,

    #[serde(default)]
    pub sub_series: Vec<String>,
}

/// A top-level category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// The full catalog, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Flatten to entries: per subcategory, episodes then sub-series
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();

        for category in &self.categories {
            for subcategory in &category.subcategories {
                let titles = subcategory.episodes.iter().chain(&subcategory.sub_series);
                for title in titles {
                    entries.push(CatalogEntry {
                        title: title.clone(),
                        category: category.title.clone(),
                        subcategory: subcategory.title.clone(),
                    });
                }
            }
        }

        entries
    }

    /// Find the entry for a title, first occurrence wins
    pub fn find(&self, title: &str) -> Option<CatalogEntry> {
        self.entries().into_iter().find(|e| e.title == title)
    }
}

/// Load-once catalog cache with explicit invalidation
#[derive(Debug)]
pub struct CatalogCache {
    path: PathBuf,
    cached: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached catalog, loading it on first use
    pub fn get(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self.cached.read().as_ref() {
            debug!("Catalog cache hit");
            return Ok(Arc::clone(catalog));
        }
        self.reload()
    }

    /// Drop the cached catalog; the next `get` reads the file again
    pub fn invalidate(&self) {
        *self.cached.write() = None;
        debug!("Catalog cache invalidated");
    }

    /// Re-read the catalog file now and replace the cached copy
    pub fn reload(&self) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = Arc::new(Catalog::load(&self.path)?);
        info!(
            "Loaded catalog from {} ({} entries)",
            self.path.display(),
            catalog.entries().len()
        );
        *self.cached.write() = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.read().is_some()
    }
}
