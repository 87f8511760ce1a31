/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::PathBuf;

use omstream::app_config::{Config, LogLevel, Voice, speed_factor_to_rate};
use crate::common;

/// Test the default configuration values
#[test]
fn test_default_shouldUseDocumentedValues() {
    let config = Config::default();

    assert_eq!(config.paths.audio_map, PathBuf::from("backend/audio_map.json"));
    assert_eq!(config.narration.female_voice, "en-IN-NeerjaNeural");
    assert_eq!(config.narration.default_voice, Voice::Male);
    assert_eq!(config.narration.on_demand_rate, "-10%");
    assert_eq!(config.narration.timeout_secs, 300);
    assert_eq!(config.mixing.ambience_volume_db, -35);
    assert!(config.mixing.ambience_file.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that the batch rate follows the speed factor
#[test]
fn test_batchRate_shouldFollowSpeedFactor() {
    let mut config = Config::default();
    assert_eq!(config.narration.batch_rate(), "+25%");

    config.narration.batch_speed_factor = 0.8;
    assert_eq!(config.narration.batch_rate(), speed_factor_to_rate(0.8));
    assert_eq!(config.narration.batch_rate(), "-20%");
}

/// Test that voice names follow the selected voice
#[test]
fn test_voiceName_shouldSelectConfiguredVoice() {
    let config = Config::default();
    assert_eq!(config.narration.voice_name(Voice::Male), "en-IN-PrabhatNeural");
    assert_eq!(config.narration.voice_name(Voice::Female), "en-IN-NeerjaNeural");
}

/// Test that a config file round trips through load_or_create
#[test]
fn test_loadOrCreate_withSavedConfig_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::sample_config(temp_dir.path())?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.paths.audio_dir, config.paths.audio_dir);
    assert_eq!(loaded.paths.catalog, config.paths.catalog);
    Ok(())
}

/// Test that a malformed config file is an error
#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ \"narration\": 3 }")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that a blank TTS command is rejected
#[test]
fn test_validate_withBlankCommand_shouldFail() {
    let mut config = Config::default();
    config.narration.tts_command = "  ".to_string();
    assert!(config.validate().is_err());
}
