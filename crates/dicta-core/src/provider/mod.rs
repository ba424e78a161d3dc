//! Provider backends for transcription and transcript cleanup.
//!
//! Both backends expose the same two-operation capability, so the pipeline
//! never learns which one it is talking to. Selection happens once, at
//! construction, from the profile's backend field.

mod azure;
mod base;
mod openai;

pub use azure::AzureBackend;
pub use openai::OpenAiBackend;

use async_trait::async_trait;
use std::time::Duration;

use crate::audio::AudioArtifact;
use crate::error::DictationError;
use crate::profile::{BackendKind, Profile};

/// Default request timeout for callers that want one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// System instruction for the cleanup chat request.
pub const CLEANUP_SYSTEM_PROMPT: &str = "You are a text cleanup assistant.";

/// Low sampling temperature: favor determinism over creativity.
pub(crate) const CLEANUP_TEMPERATURE: f32 = 0.3;

/// Output token bound for cleanup completions.
pub(crate) const CLEANUP_MAX_TOKENS: u32 = 1000;

/// User instruction for the cleanup request; the raw transcript is appended
/// verbatim by `render_cleanup_prompt`.
pub const CLEANUP_PROMPT: &str = "\
Clean up the following voice transcription for professional use.

Requirements:
- Remove filler words (um, uh, like, you know, etc.)
- Add proper punctuation and capitalization
- Break up run-on sentences for clarity
- Fix obvious transcription errors
- Preserve all technical terms and specific names
- Keep the original meaning intact
- Make it suitable for emails, chats, and professional communication

Return ONLY the cleaned text, no explanations or meta-commentary.";

pub(crate) fn render_cleanup_prompt(transcript: &str) -> String {
    format!("{CLEANUP_PROMPT}\n\nTranscription:\n{transcript}")
}

/// The two-operation capability every backend implements.
#[async_trait]
pub trait ProviderBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send the artifact's bytes to the speech-to-text endpoint and return
    /// the full-duration transcript.
    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String, DictationError>;

    /// Ask the chat endpoint to polish a raw transcript. Returns the first
    /// completion's text, trimmed of surrounding whitespace.
    async fn cleanup(&self, transcript: &str) -> Result<String, DictationError>;
}

/// Construct the backend selected by the profile.
///
/// Fails fast with `InvalidProfile` when the selected variant's credentials
/// are absent; no network call is ever made with unresolved credentials.
pub fn for_profile(
    profile: &Profile,
    timeout: Option<Duration>,
) -> Result<Box<dyn ProviderBackend>, DictationError> {
    profile.validate()?;

    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    let client = builder.build().map_err(|e| DictationError::InvalidProfile {
        profile: profile.name.clone(),
        reason: format!("failed to build HTTP client: {e}"),
    })?;

    let backend: Box<dyn ProviderBackend> = match profile.backend {
        BackendKind::OpenAi => Box::new(OpenAiBackend::new(profile, client, timeout)),
        BackendKind::Azure => Box::new(AzureBackend::new(profile, client, timeout)?),
    };
    Ok(backend)
}

/// Map a transport failure onto the stage's error, surfacing timeouts as
/// their own variant when a timeout policy is in effect.
pub(crate) fn classify(
    err: anyhow::Error,
    timeout: Option<Duration>,
    stage_err: fn(anyhow::Error) -> DictationError,
) -> DictationError {
    if let Some(limit) = timeout {
        let timed_out = err.chain().any(|cause| {
            cause
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout)
        });
        if timed_out {
            return DictationError::Timeout(limit);
        }
    }
    stage_err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CaptureParameters;
    use crate::profile::Credentials;

    fn profile(backend: BackendKind) -> Profile {
        Profile {
            name: "test".to_string(),
            backend,
            transcription_model: "whisper-1".to_string(),
            cleanup_model: "gpt-4".to_string(),
            credentials: Credentials {
                api_key: "key".to_string(),
                endpoint: Some("https://unit.openai.azure.com".to_string()),
            },
            capture: CaptureParameters::default(),
        }
    }

    #[test]
    fn both_variants_construct_behind_the_same_trait() {
        // Variant-blindness: the orchestrator only ever sees the trait object.
        let backends: Vec<Box<dyn ProviderBackend>> = vec![
            for_profile(&profile(BackendKind::OpenAi), None).unwrap(),
            for_profile(&profile(BackendKind::Azure), None).unwrap(),
        ];
        assert_eq!(backends[0].name(), "openai");
        assert_eq!(backends[1].name(), "azure");
    }

    #[test]
    fn construction_fails_fast_without_credentials() {
        let mut missing_key = profile(BackendKind::OpenAi);
        missing_key.credentials.api_key = String::new();
        assert!(matches!(
            for_profile(&missing_key, None),
            Err(DictationError::InvalidProfile { .. })
        ));

        let mut missing_endpoint = profile(BackendKind::Azure);
        missing_endpoint.credentials.endpoint = None;
        assert!(matches!(
            for_profile(&missing_endpoint, None),
            Err(DictationError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn cleanup_prompt_embeds_transcript_verbatim() {
        let transcript = "um so basically i think we should uh ship it";
        let prompt = render_cleanup_prompt(transcript);
        assert!(prompt.starts_with(CLEANUP_PROMPT));
        assert!(prompt.ends_with(transcript));
    }

    #[test]
    fn timeouts_only_classify_when_policy_is_set() {
        let err = classify(
            anyhow::anyhow!("connection reset"),
            Some(Duration::from_secs(60)),
            DictationError::Transcription,
        );
        assert!(matches!(err, DictationError::Transcription(_)));

        let err = classify(
            anyhow::anyhow!("connection reset"),
            None,
            DictationError::Cleanup,
        );
        assert!(matches!(err, DictationError::Cleanup(_)));
    }
}
