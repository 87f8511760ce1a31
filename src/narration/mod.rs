/*!
 * Narration boundary.
 *
 * Speech synthesis and audio mixing are external tools; this module defines
 * the traits the rest of the crate talks to:
 * - `synthesizer`: command-line text-to-speech implementation
 * - `mixer`: ffmpeg ambience mixing with a plain-copy fallback
 * - `mock`: in-process implementations for tests
 * - `service`: the serving path and batch episode generation
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::app_config::Voice;
use crate::errors::NarrationError;

/// Text to be spoken, with delivery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    /// Narration text
    pub text: String,
    /// Voice to use
    pub voice: Voice,
    /// Rate adjustment such as "+25%" or "-10%"
    pub rate: String,
}

/// Turns text into an audio file
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize the request into a new temporary audio file and return its path
    ///
    /// The caller owns the returned file and removes it when done.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<PathBuf, NarrationError>;
}

/// Post-processes a speech file into the final episode file
#[async_trait]
pub trait AudioMixer: Send + Sync + Debug {
    /// Produce `output` from `speech`; `speech` is left in place
    async fn mix(&self, speech: &Path, output: &Path) -> Result<(), NarrationError>;
}

pub mod mixer;
pub mod mock;
pub mod service;
pub mod synthesizer;

pub use mixer::AmbienceMixer;
pub use service::{GenerationReport, NarrationService, Playback, PlaybackSource};
pub use synthesizer::CommandSynthesizer;
