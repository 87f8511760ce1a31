use async_trait::async_trait;
use log::{debug, error, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;
use uuid::Uuid;

use super::{SpeechRequest, SpeechSynthesizer};
use crate::app_config::NarrationConfig;
use crate::errors::NarrationError;
use crate::file_utils::FileManager;

// @module: Text-to-speech through an external command line tool

/// Synthesizer that shells out to an edge-tts compatible command
///
/// Invoked as `<command> --voice <name> --rate=<rate> --file <text> --write-media <out>`.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    // @field: Voice names, command and timeout
    config: NarrationConfig,
    // @field: Directory receiving temporary speech files
    work_dir: PathBuf,
}

impl CommandSynthesizer {
    pub fn new(config: NarrationConfig, work_dir: PathBuf) -> Self {
        Self { config, work_dir }
    }

    fn speech_path(&self) -> PathBuf {
        self.work_dir.join(format!("speech_{}.mp3", Uuid::new_v4()))
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<PathBuf, NarrationError> {
        if request.text.trim().is_empty() {
            return Err(NarrationError::Synthesis("Text is required".to_string()));
        }

        std::fs::create_dir_all(&self.work_dir)
            .map_err(|e| NarrationError::Synthesis(format!("Cannot create {:?}: {}", self.work_dir, e)))?;

        // Long narration does not fit on a command line
        let mut text_file = NamedTempFile::new()
            .map_err(|e| NarrationError::Synthesis(e.to_string()))?;
        text_file
            .write_all(request.text.as_bytes())
            .map_err(|e| NarrationError::Synthesis(e.to_string()))?;

        let output = self.speech_path();
        let voice = self.config.voice_name(request.voice);

        debug!(
            "Synthesizing {} chars with {} ({}) into {:?}",
            request.text.len(),
            voice,
            request.rate,
            output
        );

        let command = Command::new(&self.config.tts_command)
            .arg("--voice")
            .arg(voice)
            .arg(format!("--rate={}", request.rate))
            .arg("--file")
            .arg(text_file.path())
            .arg("--write-media")
            .arg(&output)
            .kill_on_drop(true)
            .output();

        let timeout_secs = self.config.timeout_secs;
        let result = tokio::select! {
            result = command => {
                result.map_err(|e| NarrationError::Synthesis(
                    format!("Failed to execute {}: {}", self.config.tts_command, e)
                ))?
            },
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                discard_partial(&output);
                return Err(NarrationError::Timeout(timeout_secs));
            }
        };

        if !result.status.success() {
            discard_partial(&output);
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("Speech synthesis failed: {}", stderr.trim());
            return Err(NarrationError::Synthesis(stderr.trim().to_string()));
        }

        if !output.is_file() {
            return Err(NarrationError::Synthesis(format!(
                "{} reported success but wrote no audio",
                self.config.tts_command
            )));
        }

        Ok(output)
    }
}

// @removes: Whatever a failed run left at `path`
fn discard_partial(path: &Path) {
    if let Err(e) = FileManager::remove_if_exists(path) {
        warn!("Could not remove partial speech file: {:#}", e);
    }
}
