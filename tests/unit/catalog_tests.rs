/*!
 * Tests for the episode catalog
 */

use anyhow::Result;
use std::fs;

use omstream::catalog::{Catalog, CatalogCache};
use crate::common;

/// Test that episodes come before sub-series within each subcategory
#[test]
fn test_entries_withSampleCatalog_shouldFollowTraversalOrder() -> Result<()> {
    let catalog = Catalog::from_json(common::sample_catalog_json())?;
    let titles: Vec<String> = catalog.entries().into_iter().map(|e| e.title).collect();

    assert_eq!(titles, common::CATALOG_TITLES);
    Ok(())
}

/// Test that missing lists and titles default to empty
#[test]
fn test_fromJson_withSparseCatalog_shouldDefault() -> Result<()> {
    let catalog = Catalog::from_json(r#"[ { "title": "EMPTY" }, { "subcategories": [ { "episodes": ["Agni"] } ] } ]"#)?;
    let entries = catalog.entries();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Agni");
    assert_eq!(entries[0].category, "");
    Ok(())
}

/// Test that reload picks up a changed file without invalidation
#[test]
fn test_cache_reload_shouldReplaceCachedCatalog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "stories.json", common::sample_catalog_json())?;

    let cache = CatalogCache::new(&path);
    assert_eq!(cache.get()?.entries().len(), 5);

    fs::write(&path, r#"[ { "title": "X", "subcategories": [ { "title": "Y", "episodes": ["Agni"] } ] } ]"#)?;
    assert_eq!(cache.reload()?.entries().len(), 1);
    assert_eq!(cache.get()?.entries().len(), 1);
    Ok(())
}

/// Test that a missing catalog is an error, not an empty catalog
#[test]
fn test_cache_withMissingFile_shouldFail() {
    let cache = CatalogCache::new("no/such/stories.json");
    assert!(cache.get().is_err());
    assert!(!cache.is_loaded());
}
