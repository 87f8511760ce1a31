/*!
 * Audio map: the persisted catalog title -> audio file lookup.
 *
 * The serving path consults this map before falling back to on-demand
 * synthesis. `AudioMapBuilder` fills it by resolving every catalog title
 * against the audio files already on disk, saving after each match so an
 * interrupted build leaves a consistent file behind.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app_config::Voice;
use crate::catalog::Catalog;
use crate::errors::AudioMapError;
use crate::file_utils::FileManager;
use crate::matching::{Corpus, normalize_title, resolve};

// @const: Separator runs in generated filenames
static FILENAME_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-\s]+").unwrap()
});

// @const: Characters not allowed in on-demand filenames
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Z0-9_-]").unwrap()
});

/// Extension of every generated audio file
pub const AUDIO_EXTENSION: &str = "mp3";

/// One persisted title -> audio file record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMapEntry {
    pub filename: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub subcategory: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,
}

fn default_voice() -> String {
    Voice::Male.to_string()
}

fn default_speed_factor() -> f32 {
    1.0
}

/// Catalog title -> audio entry, kept sorted by title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioMap {
    entries: BTreeMap<String, AudioMapEntry>,
}

impl AudioMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a map file; a missing file is an empty map
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AudioMapError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No audio map at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| AudioMapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AudioMapError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the map as pretty UTF-8 JSON, replacing the file atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioMapError> {
        let path = path.as_ref();
        let write_error = |reason: String| AudioMapError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let mut json = serde_json::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        json.push('\n');

        FileManager::write_atomic(path, &json).map_err(|e| write_error(format!("{:#}", e)))
    }

    /// The lookup used by the serving path
    pub fn resolve(&self, title: &str) -> Option<&str> {
        self.entries.get(title).map(|e| e.filename.as_str())
    }

    pub fn get(&self, title: &str) -> Option<&AudioMapEntry> {
        self.entries.get(title)
    }

    /// Insert or overwrite an entry; returns true if the map changed
    pub fn upsert(&mut self, title: &str, entry: AudioMapEntry) -> bool {
        match self.entries.get(title) {
            Some(existing) if *existing == entry => false,
            _ => {
                self.entries.insert(title.to_string(), entry);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AudioMapEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Filename for a batch-generated episode: `<prefix>_<clean title>.mp3`
pub fn batch_filename(title: &str, category: &str, subcategory: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    let clean_title = FILENAME_SEPARATORS.replace_all(kept.trim(), "_");

    match category_prefix(category, subcategory) {
        Some(prefix) => format!("{}_{}.{}", prefix, clean_title, AUDIO_EXTENSION),
        None => format!("{}.{}", clean_title, AUDIO_EXTENSION),
    }
}

/// Filename for an episode synthesized on request
pub fn on_demand_filename(title: &str, voice: Voice) -> String {
    let safe_title = UNSAFE_FILENAME_CHARS.replace_all(title, "_");
    match voice {
        Voice::Female => format!("female_{}.{}", safe_title, AUDIO_EXTENSION),
        Voice::Male => format!("{}.{}", safe_title, AUDIO_EXTENSION),
    }
}

fn category_prefix(category: &str, subcategory: &str) -> Option<String> {
    if category.is_empty() || subcategory.is_empty() {
        return None;
    }

    let category = category.to_uppercase();
    let mut prefix = if category.contains("PURANIC") {
        "puranic".to_string()
    } else if category.contains("INFERIOR") {
        "inferior".to_string()
    } else {
        "general".to_string()
    };

    let subcategory = subcategory.to_uppercase();
    let suffix = if subcategory.contains("VISHNU") {
        Some("vishnu")
    } else if subcategory.contains("SHIVA") || subcategory.contains("SIVA") {
        Some("shiva")
    } else if subcategory.contains("BRAHMA") {
        Some("brahma")
    } else if subcategory.contains("PLANETS") {
        Some("planets")
    } else if subcategory.contains("RISHIS") {
        Some("rishis")
    } else if subcategory.contains("AVATAR") {
        Some("avatar")
    } else {
        None
    };

    if let Some(suffix) = suffix {
        prefix.push('_');
        prefix.push_str(suffix);
    }
    Some(prefix)
}

/// Outcome of one builder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// (catalog title, filename) pairs written this run
    pub matched: Vec<(String, String)>,
    /// Catalog titles with no matching audio file
    pub unmatched: Vec<String>,
}

/// Resolves the whole catalog against existing audio files
#[derive(Debug, Clone)]
pub struct AudioMapBuilder {
    map_path: PathBuf,
    voice: Voice,
    speed_factor: f32,
    show_progress: bool,
}

impl AudioMapBuilder {
    pub fn new<P: Into<PathBuf>>(map_path: P) -> Self {
        Self {
            map_path: map_path.into(),
            voice: Voice::Male,
            speed_factor: 1.0,
            show_progress: false,
        }
    }

    pub fn voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    pub fn speed_factor(mut self, speed_factor: f32) -> Self {
        self.speed_factor = speed_factor;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build or refresh the map file from the catalog and a set of audio filenames
    ///
    /// Misses leave existing entries untouched. The map is saved after every
    /// match; only I/O failures abort the run.
    pub fn build(&self, catalog: &Catalog, audio_files: &[String]) -> Result<BuildReport, AudioMapError> {
        let mut map = AudioMap::load(&self.map_path)?;
        let corpus = Corpus::audio_files(audio_files.iter().cloned());
        let entries = catalog.entries();

        info!(
            "Building audio map: {} catalog entries, {} audio files",
            entries.len(),
            corpus.len()
        );

        let progress = self.progress_bar(entries.len() as u64);
        let mut report = BuildReport::default();

        for entry in &entries {
            progress.set_message(entry.title.clone());
            debug!("Resolving '{}' as '{}'", entry.title, normalize_title(&entry.title));

            match resolve(&entry.title, &corpus) {
                Some(resolution) => {
                    map.upsert(
                        &entry.title,
                        AudioMapEntry {
                            filename: resolution.key.clone(),
                            category: entry.category.clone(),
                            subcategory: entry.subcategory.clone(),
                            voice: self.voice.to_string(),
                            speed_factor: self.speed_factor,
                        },
                    );
                    map.save(&self.map_path)?;
                    report.matched.push((entry.title.clone(), resolution.key));
                }
                None => report.unmatched.push(entry.title.clone()),
            }

            progress.inc(1);
        }

        if !self.map_path.exists() {
            map.save(&self.map_path)?;
        }

        progress.finish_and_clear();

        info!(
            "Audio map generated at {} ({} matched, {} unmatched)",
            self.map_path.display(),
            report.matched.len(),
            report.unmatched.len()
        );
        for title in &report.unmatched {
            warn!("No audio file for: {}", title);
        }

        Ok(report)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} titles ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress
    }
}
