use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub narration: NarrationConfig,

    /// Audio post-processing settings
    #[serde(default)]
    pub mixing: MixingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Narration voice
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Male,
    Female,
}

impl Voice {
    // @returns: Lowercase voice identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

// Implement Display trait for Voice
impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Implement FromStr trait for Voice
impl std::str::FromStr for Voice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(anyhow!("Invalid voice: {}", s)),
        }
    }
}

/// File locations used by the commands
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Marker-annotated source document (PDF or text)
    #[serde(default = "default_source_document")]
    pub source_document: PathBuf,

    /// Episode catalog JSON
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Directory holding generated audio files
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Audio map JSON
    #[serde(default = "default_audio_map")]
    pub audio_map: PathBuf,

    /// Output of the `segment` command
    #[serde(default = "default_structured_content")]
    pub structured_content: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_document: default_source_document(),
            catalog: default_catalog(),
            audio_dir: default_audio_dir(),
            audio_map: default_audio_map(),
            structured_content: default_structured_content(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NarrationConfig {
    /// Voice name for male narration
    #[serde(default = "default_male_voice")]
    pub male_voice: String,

    /// Voice name for female narration
    #[serde(default = "default_female_voice")]
    pub female_voice: String,

    /// Voice used by batch generation and when a request names none
    #[serde(default)]
    pub default_voice: Voice,

    /// Playback speed for batch-generated episodes (1.25 = 25% faster)
    #[serde(default = "default_batch_speed_factor")]
    pub batch_speed_factor: f32,

    /// Rate adjustment passed to the synthesizer for on-demand episodes
    #[serde(default = "default_on_demand_rate")]
    pub on_demand_rate: String,

    /// Text-to-speech command line tool
    #[serde(default = "default_tts_command")]
    pub tts_command: String,

    /// Timeout for one synthesis or mixing command
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            male_voice: default_male_voice(),
            female_voice: default_female_voice(),
            default_voice: Voice::default(),
            batch_speed_factor: default_batch_speed_factor(),
            on_demand_rate: default_on_demand_rate(),
            tts_command: default_tts_command(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NarrationConfig {
    // @returns: Synthesizer voice name for a voice
    pub fn voice_name(&self, voice: Voice) -> &str {
        match voice {
            Voice::Male => &self.male_voice,
            Voice::Female => &self.female_voice,
        }
    }

    // @returns: Rate string for the batch speed factor, e.g. 1.25 -> "+25%"
    pub fn batch_rate(&self) -> String {
        speed_factor_to_rate(self.batch_speed_factor)
    }
}

/// Ambience mixing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MixingConfig {
    /// Background ambience track; mixing copies the speech file when unset
    #[serde(default)]
    pub ambience_file: Option<PathBuf>,

    /// Ambience gain in dB
    #[serde(default = "default_ambience_volume_db")]
    pub ambience_volume_db: i32,

    /// ffmpeg executable
    #[serde(default = "default_ffmpeg_command")]
    pub ffmpeg_command: String,
}

impl Default for MixingConfig {
    fn default() -> Self {
        Self {
            ambience_file: None,
            ambience_volume_db: default_ambience_volume_db(),
            ffmpeg_command: default_ffmpeg_command(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Convert a speed factor to a synthesizer rate adjustment
pub fn speed_factor_to_rate(speed_factor: f32) -> String {
    let percent = ((speed_factor - 1.0) * 100.0).round() as i32;
    format!("{:+}%", percent)
}

/// Inverse of `speed_factor_to_rate`; `None` for anything but `[+-]N%`
pub fn rate_to_speed_factor(rate: &str) -> Option<f32> {
    let percent: i32 = rate.trim().strip_suffix('%')?.parse().ok()?;
    Some((100 + percent) as f32 / 100.0)
}

fn default_source_document() -> PathBuf {
    PathBuf::from("backend/assets/mythology_source.pdf")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("backend/app/data/stories.json")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("backend/static/audio")
}

fn default_audio_map() -> PathBuf {
    PathBuf::from("backend/audio_map.json")
}

fn default_structured_content() -> PathBuf {
    PathBuf::from("backend/structured_content.json")
}

fn default_male_voice() -> String {
    "en-IN-PrabhatNeural".to_string()
}

fn default_female_voice() -> String {
    "en-IN-NeerjaNeural".to_string()
}

fn default_batch_speed_factor() -> f32 {
    1.25
}

fn default_on_demand_rate() -> String {
    // Slower delivery for narration requested live
    "-10%".to_string()
}

fn default_tts_command() -> String {
    "edge-tts".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_ambience_volume_db() -> i32 {
    -35
}

fn default_ffmpeg_command() -> String {
    "ffmpeg".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.paths.audio_dir.as_os_str().is_empty() {
            return Err(anyhow!("Audio directory must not be empty"));
        }

        if self.paths.audio_map.as_os_str().is_empty() {
            return Err(anyhow!("Audio map path must not be empty"));
        }

        let speed = self.narration.batch_speed_factor;
        if speed.is_nan() || speed <= 0.0 {
            return Err(anyhow!(
                "Batch speed factor must be positive, got {}",
                self.narration.batch_speed_factor
            ));
        }

        if self.narration.timeout_secs == 0 {
            return Err(anyhow!("Narration timeout must be at least one second"));
        }

        if self.narration.tts_command.trim().is_empty() {
            return Err(anyhow!("A text-to-speech command is required"));
        }

        Ok(())
    }

    /// Load a configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
