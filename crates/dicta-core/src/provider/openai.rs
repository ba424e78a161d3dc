//! OpenAI backend: flat model addressing with bearer-token auth.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::base::{Auth, chat_request, transcribe_request};
use super::{
    CLEANUP_MAX_TOKENS, CLEANUP_SYSTEM_PROMPT, CLEANUP_TEMPERATURE, ProviderBackend, classify,
    render_cleanup_prompt,
};
use crate::audio::AudioArtifact;
use crate::error::DictationError;
use crate::profile::Profile;

const OPENAI_TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiBackend {
    client: reqwest::Client,
    auth: Auth,
    transcription_model: String,
    cleanup_model: String,
    timeout: Option<Duration>,
}

impl OpenAiBackend {
    pub(crate) fn new(profile: &Profile, client: reqwest::Client, timeout: Option<Duration>) -> Self {
        Self {
            client,
            auth: Auth::Bearer(profile.credentials.api_key.clone()),
            transcription_model: profile.transcription_model.clone(),
            cleanup_model: profile.cleanup_model.clone(),
            timeout,
        }
    }
}

#[async_trait]
impl ProviderBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String, DictationError> {
        let audio = tokio::fs::read(&artifact.path)
            .await
            .with_context(|| format!("Failed to read recording {}", artifact.path.display()))
            .map_err(DictationError::Transcription)?;

        transcribe_request(
            &self.client,
            OPENAI_TRANSCRIPTION_URL,
            &self.auth,
            Some(&self.transcription_model),
            audio,
            artifact.file_name(),
        )
        .await
        .map_err(|e| classify(e, self.timeout, DictationError::Transcription))
    }

    async fn cleanup(&self, transcript: &str) -> Result<String, DictationError> {
        chat_request(
            &self.client,
            OPENAI_CHAT_URL,
            &self.auth,
            Some(&self.cleanup_model),
            CLEANUP_SYSTEM_PROMPT,
            &render_cleanup_prompt(transcript),
            CLEANUP_TEMPERATURE,
            CLEANUP_MAX_TOKENS,
        )
        .await
        .map_err(|e| classify(e, self.timeout, DictationError::Cleanup))
    }
}
