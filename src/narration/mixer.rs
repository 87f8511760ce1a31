use async_trait::async_trait;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use super::AudioMixer;
use crate::app_config::MixingConfig;
use crate::errors::NarrationError;
use crate::file_utils::FileManager;

// @module: Background ambience mixing

/// Mixer that lays a quiet ambience track under the narration with ffmpeg
///
/// Without a configured (or present) ambience file the speech is copied as-is.
#[derive(Debug, Clone)]
pub struct AmbienceMixer {
    config: MixingConfig,
    timeout_secs: u64,
}

impl AmbienceMixer {
    pub fn new(config: MixingConfig, timeout_secs: u64) -> Self {
        Self { config, timeout_secs }
    }

    // @returns: Ambience track when configured and present on disk
    fn ambience(&self) -> Option<&PathBuf> {
        match &self.config.ambience_file {
            Some(path) if path.is_file() => Some(path),
            Some(path) => {
                warn!("Ambience file {:?} not found, narration will be unmixed", path);
                None
            }
            None => None,
        }
    }

    /// ffmpeg filter graph: attenuate the ambience, loop it, cut at the speech's end
    pub fn filter_graph(&self) -> String {
        format!(
            "[1:a]volume={}dB[bg];[0:a][bg]amix=inputs=2:duration=first:dropout_transition=0[out]",
            self.config.ambience_volume_db
        )
    }
}

#[async_trait]
impl AudioMixer for AmbienceMixer {
    async fn mix(&self, speech: &Path, output: &Path) -> Result<(), NarrationError> {
        if !speech.is_file() {
            return Err(NarrationError::Mixing(format!("Speech file {:?} does not exist", speech)));
        }

        if let Some(parent) = output.parent() {
            FileManager::ensure_dir(parent).map_err(|e| NarrationError::Mixing(e.to_string()))?;
        }

        let Some(ambience) = self.ambience() else {
            return FileManager::copy_file(speech, output)
                .map_err(|e| NarrationError::Mixing(e.to_string()));
        };

        debug!("Mixing {:?} with ambience {:?} into {:?}", speech, ambience, output);

        let command = Command::new(&self.config.ffmpeg_command)
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(speech)
            .arg("-stream_loop")
            .arg("-1")
            .arg("-i")
            .arg(ambience)
            .arg("-filter_complex")
            .arg(self.filter_graph())
            .arg("-map")
            .arg("[out]")
            .arg(output)
            .kill_on_drop(true)
            .output();

        let result = tokio::select! {
            result = command => {
                result.map_err(|e| NarrationError::Mixing(
                    format!("Failed to execute {}: {}", self.config.ffmpeg_command, e)
                ))?
            },
            _ = tokio::time::sleep(Duration::from_secs(self.timeout_secs)) => {
                return Err(NarrationError::Timeout(self.timeout_secs));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("Ambience mixing failed: {}", stderr.trim());
            return Err(NarrationError::Mixing(stderr.trim().to_string()));
        }

        Ok(())
    }
}
