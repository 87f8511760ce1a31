/*!
 * Mock narration implementations for testing.
 *
 * - `MockSynthesizer::working()` writes the narration text as the "audio"
 * - `MockSynthesizer::failing()` always errors
 * - `MockSynthesizer::intermittent(n)` fails every nth request
 * - `MockMixer` copies the speech file, fails, or leaves a partial output behind
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use super::{AudioMixer, SpeechRequest, SpeechSynthesizer};
use crate::errors::NarrationError;

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails every Nth request (1-based)
    Intermittent { fail_every: usize },
    /// Always fails
    Failing,
}

/// Mock synthesizer recording every request it receives
#[derive(Debug)]
pub struct MockSynthesizer {
    behavior: MockBehavior,
    work_dir: PathBuf,
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockSynthesizer {
    pub fn new(behavior: MockBehavior, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            behavior,
            work_dir: work_dir.into(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working(work_dir: impl Into<PathBuf>) -> Self {
        Self::new(MockBehavior::Working, work_dir)
    }

    pub fn failing(work_dir: impl Into<PathBuf>) -> Self {
        Self::new(MockBehavior::Failing, work_dir)
    }

    pub fn intermittent(work_dir: impl Into<PathBuf>, fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every }, work_dir)
    }

    /// Number of synthesize calls so far, failed ones included
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().clone()
    }

    /// Shared handle to the recorded requests, usable after the mock is moved
    pub fn request_log(&self) -> Arc<Mutex<Vec<SpeechRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<PathBuf, NarrationError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().push(request.clone());

        let fail = match self.behavior {
            MockBehavior::Working => false,
            MockBehavior::Failing => true,
            MockBehavior::Intermittent { fail_every } => fail_every > 0 && count % fail_every == 0,
        };
        if fail {
            return Err(NarrationError::Synthesis(format!("Mock failure on request {}", count)));
        }

        std::fs::create_dir_all(&self.work_dir)
            .map_err(|e| NarrationError::Synthesis(e.to_string()))?;
        let path = self.work_dir.join(format!("speech_{}.mp3", Uuid::new_v4()));
        std::fs::write(&path, request.text.as_bytes())
            .map_err(|e| NarrationError::Synthesis(e.to_string()))?;

        Ok(path)
    }
}

/// What the mock mixer does with each request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MixerBehavior {
    /// Copies the speech file to the output
    #[default]
    Copying,
    /// Fails without touching the output
    Failing,
    /// Writes a partial output, then reports a timeout
    Truncating,
}

/// Bytes a truncating mock mixer leaves behind
pub const TRUNCATED_AUDIO: &[u8] = b"ID3 trunc";

/// Mock mixer that copies the speech file to the output
#[derive(Debug, Default)]
pub struct MockMixer {
    behavior: MixerBehavior,
    mix_count: AtomicUsize,
}

impl MockMixer {
    pub fn new(behavior: MixerBehavior) -> Self {
        Self {
            behavior,
            mix_count: AtomicUsize::new(0),
        }
    }

    pub fn working() -> Self {
        Self::new(MixerBehavior::Copying)
    }

    pub fn failing() -> Self {
        Self::new(MixerBehavior::Failing)
    }

    pub fn truncating() -> Self {
        Self::new(MixerBehavior::Truncating)
    }

    pub fn mix_count(&self) -> usize {
        self.mix_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioMixer for MockMixer {
    async fn mix(&self, speech: &Path, output: &Path) -> Result<(), NarrationError> {
        self.mix_count.fetch_add(1, Ordering::SeqCst);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| NarrationError::Mixing(e.to_string()))?;
        }

        match self.behavior {
            MixerBehavior::Failing => Err(NarrationError::Mixing("Mock mixer failure".to_string())),
            MixerBehavior::Truncating => {
                std::fs::write(output, TRUNCATED_AUDIO).map_err(|e| NarrationError::Mixing(e.to_string()))?;
                Err(NarrationError::Timeout(300))
            }
            MixerBehavior::Copying => {
                std::fs::copy(speech, output).map_err(|e| NarrationError::Mixing(e.to_string()))?;
                Ok(())
            }
        }
    }
}
