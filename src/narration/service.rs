/*!
 * Narration service: serving episodes and generating them in batch.
 *
 * `play` answers a listener's request for one title. It prefers the audio
 * map, then an earlier on-demand file, and only synthesizes as a last
 * resort. `generate_all` walks the whole catalog and produces every missing
 * episode at the batch speed.
 */

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;

use super::{AmbienceMixer, AudioMixer, CommandSynthesizer, SpeechRequest, SpeechSynthesizer};
use crate::app_config::{Config, Voice, rate_to_speed_factor};
use crate::audio_map::{AudioMap, AudioMapEntry, batch_filename, on_demand_filename};
use crate::catalog::{CatalogCache, CatalogEntry};
use crate::document::{ChapterSource, ChapterText, story_in};
use crate::errors::{AppError, NarrationError};
use crate::file_utils::FileManager;

/// Page-scanned text at or below this many characters is not worth narrating
pub const MIN_SCANNED_NARRATION_LENGTH: usize = 200;

/// URL prefix under which the audio directory is served
pub const AUDIO_URL_PREFIX: &str = "/audio";

/// Narration used when no usable source text exists for a title
pub fn placeholder_narration(title: &str) -> String {
    format!(
        "Welcome to the ancient story of {}. This is a demonstration of the OmStream audio engine. \
         In the final version, the complete scripture will be narrated, bringing to life the epic \
         tales of gods, demons, and heroes.",
        title
    )
}

/// How a playback request was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackSource {
    /// Listed in the audio map
    AudioMap,
    /// An on-demand file from an earlier request
    Existing,
    /// Synthesized for this request
    Synthesized,
}

/// Answer to a playback request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playback {
    pub title: String,
    pub filename: String,
    pub url: String,
    pub source: PlaybackSource,
}

impl Playback {
    fn new(title: &str, filename: &str, source: PlaybackSource) -> Self {
        Self {
            title: title.to_string(),
            filename: filename.to_string(),
            url: format!("{}/{}", AUDIO_URL_PREFIX, filename),
            source,
        }
    }
}

/// Outcome of a batch generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Titles synthesized this run
    pub generated: Vec<String>,
    /// Titles whose audio file was already present
    pub existing: Vec<String>,
    /// Titles with no matching chapter in the source document
    pub no_content: Vec<String>,
    /// (title, reason) for entries whose synthesis or mixing failed
    pub failed: Vec<(String, String)>,
}

impl GenerationReport {
    pub fn total(&self) -> usize {
        self.generated.len() + self.existing.len() + self.no_content.len() + self.failed.len()
    }
}

/// Serves and generates narrated episodes
#[derive(Debug)]
pub struct NarrationService {
    config: Config,
    source: ChapterSource,
    catalog: CatalogCache,
    synthesizer: Box<dyn SpeechSynthesizer>,
    mixer: Box<dyn AudioMixer>,
}

impl NarrationService {
    pub fn new(
        config: Config,
        synthesizer: Box<dyn SpeechSynthesizer>,
        mixer: Box<dyn AudioMixer>,
    ) -> Self {
        let source = ChapterSource::new(config.paths.source_document.clone());
        let catalog = CatalogCache::new(config.paths.catalog.clone());
        Self {
            config,
            source,
            catalog,
            synthesizer,
            mixer,
        }
    }

    /// Service backed by the configured external tools
    pub fn from_config(config: Config) -> Self {
        let synthesizer = CommandSynthesizer::new(config.narration.clone(), config.paths.audio_dir.clone());
        let mixer = AmbienceMixer::new(config.mixing.clone(), config.narration.timeout_secs);
        Self::new(config, Box::new(synthesizer), Box::new(mixer))
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn source(&self) -> &ChapterSource {
        &self.source
    }

    fn audio_dir(&self) -> &Path {
        &self.config.paths.audio_dir
    }

    fn map_path(&self) -> &Path {
        &self.config.paths.audio_map
    }

    /// Resolve a title to playable audio, synthesizing it if nothing exists yet
    pub async fn play(&self, title: &str, voice: Voice) -> Result<Playback, AppError> {
        let mut map = AudioMap::load(self.map_path())?;
        if let Some(filename) = map.resolve(title) {
            debug!("Audio map hit for '{}': {}", title, filename);
            return Ok(Playback::new(title, filename, PlaybackSource::AudioMap));
        }

        let filename = on_demand_filename(title, voice);
        let output = self.audio_dir().join(&filename);
        if FileManager::file_exists(&output) {
            debug!("Reusing on-demand audio {}", output.display());
            return Ok(Playback::new(title, &filename, PlaybackSource::Existing));
        }

        info!("Generating on-demand narration for '{}' ({} voice)", title, voice);
        let text = self.narration_text(title);
        let request = SpeechRequest {
            text,
            voice,
            rate: self.config.narration.on_demand_rate.clone(),
        };
        self.render(&request, &output).await?;

        let (category, subcategory) = self.catalog_placement(title);
        let speed_factor = rate_to_speed_factor(&request.rate).unwrap_or(1.0);
        map.upsert(
            title,
            AudioMapEntry {
                filename: filename.clone(),
                category,
                subcategory,
                voice: voice.to_string(),
                speed_factor,
            },
        );
        map.save(self.map_path())?;

        Ok(Playback::new(title, &filename, PlaybackSource::Synthesized))
    }

    /// Best available narration text for a title; never fails
    pub fn narration_text(&self, title: &str) -> String {
        match self.source.lookup(title) {
            Ok(Some(ChapterText::Marked { chapter_title, text })) => {
                debug!("Narrating '{}' from chapter '{}'", title, chapter_title);
                text
            }
            Ok(Some(ChapterText::Scanned { text })) if text.chars().count() > MIN_SCANNED_NARRATION_LENGTH => {
                debug!("Narrating '{}' from page scan ({} chars)", title, text.len());
                text
            }
            Ok(_) => {
                warn!("No usable source text for '{}', using placeholder narration", title);
                placeholder_narration(title)
            }
            Err(e) => {
                warn!("{}; using placeholder narration for '{}'", e, title);
                placeholder_narration(title)
            }
        }
    }

    /// Synthesize every catalog entry whose audio file does not exist yet
    ///
    /// Per-entry synthesis and mixing failures are counted; map and source
    /// failures abort the run.
    pub async fn generate_all(&self, show_progress: bool) -> Result<GenerationReport, AppError> {
        let catalog = self.catalog.get()?;
        let entries = catalog.entries();
        let chapters = self.source.chapters()?;
        let mut map = AudioMap::load(self.map_path())?;
        FileManager::ensure_dir(self.audio_dir())?;

        info!(
            "Generating episodes: {} catalog entries, {} chapters",
            entries.len(),
            chapters.len()
        );

        let progress = progress_bar(entries.len() as u64, show_progress);
        let rate = self.config.narration.batch_rate();
        let voice = self.config.narration.default_voice;
        let mut report = GenerationReport::default();

        for entry in &entries {
            progress.set_message(entry.title.clone());
            let filename = batch_filename(&entry.title, &entry.category, &entry.subcategory);
            let output = self.audio_dir().join(&filename);

            if FileManager::file_exists(&output) {
                debug!("Skipping '{}': {} exists", entry.title, filename);
                self.record(&mut map, entry, &filename)?;
                report.existing.push(entry.title.clone());
                progress.inc(1);
                continue;
            }

            let Some(text) = story_in(&chapters, &entry.title) else {
                warn!("No chapter content for '{}'", entry.title);
                report.no_content.push(entry.title.clone());
                progress.inc(1);
                continue;
            };

            let request = SpeechRequest {
                text,
                voice,
                rate: rate.clone(),
            };
            match self.render(&request, &output).await {
                Ok(()) => {
                    info!("Generated {}", filename);
                    self.record(&mut map, entry, &filename)?;
                    report.generated.push(entry.title.clone());
                }
                Err(e) => {
                    error!("Failed to generate '{}': {}", entry.title, e);
                    report.failed.push((entry.title.clone(), e.to_string()));
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!(
            "Generation finished: {} generated, {} existing, {} without content, {} failed",
            report.generated.len(),
            report.existing.len(),
            report.no_content.len(),
            report.failed.len()
        );

        Ok(report)
    }

    // @writes: Final audio at `output` only when mixing succeeds; temporary files are always removed
    async fn render(&self, request: &SpeechRequest, output: &Path) -> Result<(), NarrationError> {
        let speech: PathBuf = self.synthesizer.synthesize(request).await?;
        let mixed = self.mix_into(&speech, output).await;

        if let Err(e) = FileManager::remove_if_exists(&speech) {
            warn!("Could not remove temporary speech file: {:#}", e);
        }
        mixed
    }

    async fn mix_into(&self, speech: &Path, output: &Path) -> Result<(), NarrationError> {
        let dir = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        FileManager::ensure_dir(&dir).map_err(|e| NarrationError::Mixing(format!("{:#}", e)))?;

        // Dropping the temp path removes whatever a failed mix left behind
        let partial = tempfile::Builder::new()
            .prefix(".partial_")
            .suffix(".mp3")
            .tempfile_in(&dir)
            .map_err(|e| NarrationError::Mixing(e.to_string()))?
            .into_temp_path();

        self.mixer.mix(speech, &partial).await?;
        partial
            .persist(output)
            .map_err(|e| NarrationError::Mixing(format!("Failed to move mixed audio to {:?}: {}", output, e)))?;
        Ok(())
    }

    fn record(&self, map: &mut AudioMap, entry: &CatalogEntry, filename: &str) -> Result<(), AppError> {
        let changed = map.upsert(
            &entry.title,
            AudioMapEntry {
                filename: filename.to_string(),
                category: entry.category.clone(),
                subcategory: entry.subcategory.clone(),
                voice: self.config.narration.default_voice.to_string(),
                speed_factor: self.config.narration.batch_speed_factor,
            },
        );
        if changed {
            map.save(self.map_path())?;
        }
        Ok(())
    }

    fn catalog_placement(&self, title: &str) -> (String, String) {
        match self.catalog.get() {
            Ok(catalog) => catalog
                .find(title)
                .map(|e| (e.category, e.subcategory))
                .unwrap_or_default(),
            Err(e) => {
                debug!("Catalog unavailable for '{}': {}", title, e);
                (String::new(), String::new())
            }
        }
    }
}

fn progress_bar(len: u64, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("█▓▒░"));
    progress
}
