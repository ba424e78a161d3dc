//! The dictation pipeline: capture, transcribe, clean up, publish.
//!
//! One run moves through `Capturing → Transcribing → CleaningUp →
//! Publishing → Done` in strict order; any stage failure surfaces as a
//! `PipelineFailure` carrying the stage it stopped at. The recording
//! artifact is removed before the failure is returned (best-effort) and
//! after a successful run, unless the caller asked to keep it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::audio::{self, AudioArtifact, MicrophoneRecorder, Recorder};
use crate::error::DictationError;
use crate::profile::Profile;
use crate::provider::ProviderBackend;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capturing,
    Transcribing,
    CleaningUp,
    Publishing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Capturing => "capturing",
            Stage::Transcribing => "transcribing",
            Stage::CleaningUp => "cleaning up",
            Stage::Publishing => "publishing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A run that stopped before `Done`.
#[derive(Debug, Error)]
#[error("dictation failed while {stage}: {source}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub source: DictationError,
}

/// Receives the final cleaned text. The pipeline's obligation ends at
/// handing the string off.
pub trait TextSink: Send {
    fn publish(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Orchestrates one capture → transcribe → cleanup → publish run.
///
/// Each run constructs its own backend and artifact; instances share no
/// mutable state.
pub struct DictationPipeline<'a> {
    profile: &'a Profile,
    recorder: Arc<dyn Recorder>,
    backend: Box<dyn ProviderBackend>,
}

impl<'a> DictationPipeline<'a> {
    pub fn new(profile: &'a Profile, backend: Box<dyn ProviderBackend>) -> Self {
        Self {
            profile,
            recorder: Arc::new(MicrophoneRecorder),
            backend,
        }
    }

    /// Substitute the audio source (synthetic input, tests).
    pub fn with_recorder(mut self, recorder: Arc<dyn Recorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Run the pipeline to completion, returning the cleaned text.
    ///
    /// `destination` requests a retained recording at that path; otherwise a
    /// temporary file is used and removed before this returns.
    pub async fn run(
        &self,
        destination: Option<PathBuf>,
        sink: &mut dyn TextSink,
    ) -> Result<String, PipelineFailure> {
        let params = self.profile.capture.clone();
        let recorder = Arc::clone(&self.recorder);

        // Capture blocks for the full duration; keep it off the async runtime.
        let artifact = tokio::task::spawn_blocking(move || recorder.record(&params, destination))
            .await
            .map_err(|e| PipelineFailure {
                stage: Stage::Capturing,
                source: DictationError::CaptureIo(anyhow::anyhow!("capture task panicked: {e}")),
            })?
            .map_err(|source| PipelineFailure {
                stage: Stage::Capturing,
                source,
            })?;

        let transcript = match self.backend.transcribe(&artifact).await {
            Ok(text) => text,
            Err(source) => return Err(self.abandon(&artifact, Stage::Transcribing, source)),
        };

        // An empty transcript is a legitimate (if degenerate) input for the
        // cleanup backend, not an error; it still goes through.
        if transcript.trim().is_empty() {
            crate::verbose!("transcript is empty; cleanup still runs");
        }

        let cleaned = match self.backend.cleanup(&transcript).await {
            Ok(text) => text,
            Err(source) => return Err(self.abandon(&artifact, Stage::CleaningUp, source)),
        };

        if let Err(e) = sink.publish(&cleaned) {
            return Err(self.abandon(&artifact, Stage::Publishing, DictationError::Publish(e)));
        }

        self.release(&artifact);
        Ok(cleaned)
    }

    /// Best-effort artifact removal before surfacing a failure.
    fn abandon(
        &self,
        artifact: &AudioArtifact,
        stage: Stage,
        source: DictationError,
    ) -> PipelineFailure {
        self.release(artifact);
        PipelineFailure { stage, source }
    }

    /// Delete the recording unless the caller asked to keep it. Cleanup
    /// failures are logged, never escalated.
    fn release(&self, artifact: &AudioArtifact) {
        if artifact.retained {
            return;
        }
        if let Err(e) = audio::cleanup_artifact(artifact) {
            crate::verbose!("failed to remove recording {}: {e}", artifact.path.display());
        }
    }
}
