use anyhow::{Context, Result};
use log::{info, warn};
use std::time::Instant;

use crate::app_config::{Config, Voice};
use crate::audio_map::{AUDIO_EXTENSION, AudioMap, AudioMapBuilder, BuildReport};
use crate::catalog::Catalog;
use crate::document::ChapterSet;
use crate::file_utils::FileManager;
use crate::narration::{GenerationReport, NarrationService, Playback};

// @module: Application controller wiring configuration to the commands

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Serving path and batch generation
    narration: NarrationService,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a controller backed by the configured external tools
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let narration = NarrationService::from_config(config.clone());
        Ok(Self { config, narration })
    }

    // @method: Create a controller around an existing narration service
    pub fn with_service(config: Config, narration: NarrationService) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self { config, narration })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the source document and write the structured content file
    pub fn segment(&self) -> Result<ChapterSet> {
        let start_time = Instant::now();
        let source = self.narration.source();

        let chapters = source
            .chapters()
            .with_context(|| format!("Failed to segment {}", source.path().display()))?;

        let mut json = serde_json::to_string_pretty(&chapters)
            .context("Failed to serialize structured content")?;
        json.push('\n');
        FileManager::write_atomic(&self.config.paths.structured_content, &json)?;

        info!(
            "Wrote {} chapters to {} in {:.2}s",
            chapters.len(),
            self.config.paths.structured_content.display(),
            start_time.elapsed().as_secs_f64()
        );
        if chapters.is_empty() {
            warn!("No chapter markers found in {}", source.path().display());
        }

        Ok(chapters)
    }

    /// Build or refresh the audio map from the catalog and the audio directory
    pub fn build_map(&self, show_progress: bool) -> Result<BuildReport> {
        let catalog = Catalog::load(&self.config.paths.catalog)?;
        let audio_files = FileManager::list_files_with_extension(&self.config.paths.audio_dir, AUDIO_EXTENSION)?;

        if audio_files.is_empty() {
            warn!("No audio files found in {}", self.config.paths.audio_dir.display());
        }

        let report = AudioMapBuilder::new(&self.config.paths.audio_map)
            .voice(self.config.narration.default_voice)
            .speed_factor(self.config.narration.batch_speed_factor)
            .show_progress(show_progress)
            .build(&catalog, &audio_files)?;

        Ok(report)
    }

    /// Generate every missing episode
    pub async fn generate(&self, show_progress: bool) -> Result<GenerationReport> {
        let start_time = Instant::now();
        let report = self.narration.generate_all(show_progress).await?;
        info!(
            "Processed {} catalog entries in {:.2}s",
            report.total(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    /// Audio filename the serving path would use for a title, if mapped
    pub fn resolve(&self, title: &str) -> Result<Option<String>> {
        let map = AudioMap::load(&self.config.paths.audio_map)?;
        Ok(map.resolve(title).map(str::to_string))
    }

    /// Serve a title, synthesizing on demand when needed
    pub async fn play(&self, title: &str, voice: Option<Voice>) -> Result<Playback> {
        let voice = voice.unwrap_or(self.config.narration.default_voice);
        let playback = self
            .narration
            .play(title, voice)
            .await
            .with_context(|| format!("Failed to play '{}'", title))?;
        Ok(playback)
    }
}
