/*!
 * Integration tests for building the audio map from a catalog and audio directory
 */

use anyhow::Result;
use std::fs;

use omstream::app_controller::Controller;
use omstream::audio_map::{AudioMap, AudioMapBuilder, AudioMapEntry};
use omstream::catalog::Catalog;
use omstream::file_utils::FileManager;
use crate::common;

const MATSYA_FILE: &str = "puranic_vishnu_1_The_Matsya_or_Fish_Avatāra.mp3";
const SOMA_FILE: &str = "inferior_planets_2_Soma_Moon.mp3";
const UMA_FILE: &str = "general_Umā.mp3";

fn audio_files() -> Vec<String> {
    vec![UMA_FILE.to_string(), SOMA_FILE.to_string(), MATSYA_FILE.to_string()]
}

/// Test matched and unmatched titles of one run
#[test]
fn test_build_withSampleCatalog_shouldMatchResolvableTitles() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let map_path = temp_dir.path().join("audio_map.json");
    let catalog = Catalog::from_json(common::sample_catalog_json())?;

    let report = AudioMapBuilder::new(&map_path)
        .speed_factor(1.25)
        .build(&catalog, &audio_files())?;

    let matched: Vec<(&str, &str)> = report
        .matched
        .iter()
        .map(|(title, file)| (title.as_str(), file.as_str()))
        .collect();
    assert_eq!(
        matched,
        vec![
            ("1. The Matsya or Fish Avatāra", MATSYA_FILE),
            ("2. Soma (Moon)", SOMA_FILE),
            ("Pārvati", UMA_FILE),
        ]
    );
    assert_eq!(report.unmatched, vec!["2. The Kūrma or Tortoise Avatāra", "Varuna"]);

    let map = AudioMap::load(&map_path)?;
    assert_eq!(map.len(), 3);
    let soma = map.get("2. Soma (Moon)").unwrap();
    assert_eq!(soma.category, "INFERIOR DEITIES");
    assert_eq!(soma.subcategory, "Planets");
    assert_eq!(soma.voice, "male");
    assert_eq!(soma.speed_factor, 1.25);
    assert_eq!(map.resolve("Varuna"), None);
    Ok(())
}

/// Test that a second run over unchanged inputs writes identical bytes
#[test]
fn test_build_twice_shouldBeByteIdentical() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let map_path = temp_dir.path().join("audio_map.json");
    let catalog = Catalog::from_json(common::sample_catalog_json())?;
    let builder = AudioMapBuilder::new(&map_path);

    builder.build(&catalog, &audio_files())?;
    let first = fs::read(&map_path)?;

    let report = builder.build(&catalog, &audio_files())?;
    assert_eq!(fs::read(&map_path)?, first);
    assert_eq!(report.matched.len(), 3);
    Ok(())
}

/// Test that misses leave earlier entries alone
#[test]
fn test_build_withExistingEntryForUnmatchedTitle_shouldKeepIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let map_path = temp_dir.path().join("audio_map.json");

    let mut existing = AudioMap::new();
    existing.upsert(
        "Varuna",
        AudioMapEntry {
            filename: "legacy_varuna_recording.mp3".to_string(),
            category: "GODDESSES".to_string(),
            subcategory: "Consorts".to_string(),
            voice: "female".to_string(),
            speed_factor: 1.0,
        },
    );
    existing.save(&map_path)?;

    let catalog = Catalog::from_json(common::sample_catalog_json())?;
    AudioMapBuilder::new(&map_path).build(&catalog, &audio_files())?;

    let map = AudioMap::load(&map_path)?;
    assert_eq!(map.resolve("Varuna"), Some("legacy_varuna_recording.mp3"));
    assert_eq!(map.get("Varuna").unwrap().voice, "female");
    assert_eq!(map.len(), 4);
    Ok(())
}

/// Test that an empty audio directory still produces a map file
#[test]
fn test_build_withNoAudioFiles_shouldWriteEmptyMap() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let map_path = temp_dir.path().join("audio_map.json");
    let catalog = Catalog::from_json(common::sample_catalog_json())?;

    let report = AudioMapBuilder::new(&map_path).build(&catalog, &[])?;

    assert!(report.matched.is_empty());
    assert_eq!(report.unmatched.len(), 5);
    assert_eq!(fs::read_to_string(&map_path)?, "{}\n");
    Ok(())
}

/// Test the controller wiring of the map command and the serving lookup
#[test]
fn test_controller_buildMapThenResolve_shouldServeMappedFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::sample_config(temp_dir.path())?;
    for name in audio_files() {
        common::create_test_file(&config.paths.audio_dir, &name, "ID3")?;
    }
    common::create_test_file(&config.paths.audio_dir, "cover.jpg", "")?;
    assert_eq!(FileManager::list_files_with_extension(&config.paths.audio_dir, "mp3")?.len(), 3);

    let controller = Controller::with_config(config)?;
    let report = controller.build_map(false)?;

    assert_eq!(report.matched.len(), 3);
    assert_eq!(controller.resolve("Pārvati")?, Some(UMA_FILE.to_string()));
    assert_eq!(controller.resolve("Varuna")?, None);
    Ok(())
}
