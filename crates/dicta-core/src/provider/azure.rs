//! Azure OpenAI backend: per-deployment addressing with `api-key` auth.
//!
//! Azure routes requests to `{endpoint}/openai/deployments/{deployment}/...`
//! with the API version as a query parameter, so no model field is sent in
//! the request body.

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

const AZURE_API_VERSION: &str = "2024-02-15-preview";

pub struct AzureBackend {
    client: reqwest::Client,
    auth: Auth,
    endpoint: String,
    transcription_deployment: String,
    cleanup_deployment: String,
    timeout: Option<Duration>,
}

impl AzureBackend {
    pub(crate) fn new(
        profile: &Profile,
        client: reqwest::Client,
        timeout: Option<Duration>,
    ) -> Result<Self, DictationError> {
        let endpoint = profile
            .credentials
            .endpoint
            .clone()
            .ok_or_else(|| DictationError::InvalidProfile {
                profile: profile.name.clone(),
                reason: "azure backend requires an endpoint".to_string(),
            })?;

        Ok(Self {
            client,
            auth: Auth::ApiKey(profile.credentials.api_key.clone()),
            endpoint,
            transcription_deployment: profile.transcription_model.clone(),
            cleanup_deployment: profile.cleanup_model.clone(),
            timeout,
        })
    }
}

/// Build a per-deployment Azure URL for the given operation path.
fn deployment_url(endpoint: &str, deployment: &str, operation: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    format!("{base}/openai/deployments/{deployment}/{operation}?api-version={AZURE_API_VERSION}")
}

#[async_trait]
impl ProviderBackend for AzureBackend {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String, DictationError> {
        let audio = tokio::fs::read(&artifact.path)
            .await
            .with_context(|| format!("Failed to read recording {}", artifact.path.display()))
            .map_err(DictationError::Transcription)?;

        let url = deployment_url(
            &self.endpoint,
            &self.transcription_deployment,
            "audio/transcriptions",
        );
        transcribe_request(&self.client, &url, &self.auth, None, audio, artifact.file_name())
            .await
            .map_err(|e| classify(e, self.timeout, DictationError::Transcription))
    }

    async fn cleanup(&self, transcript: &str) -> Result<String, DictationError> {
        let url = deployment_url(&self.endpoint, &self.cleanup_deployment, "chat/completions");
        chat_request(
            &self.client,
            &url,
            &self.auth,
            None,
            CLEANUP_SYSTEM_PROMPT,
            &render_cleanup_prompt(transcript),
            CLEANUP_TEMPERATURE,
            CLEANUP_MAX_TOKENS,
        )
        .await
        .map_err(|e| classify(e, self.timeout, DictationError::Cleanup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_url_addresses_the_deployment() {
        let url = deployment_url(
            "https://my-resource.openai.azure.com",
            "whisper-prod",
            "audio/transcriptions",
        );
        assert_eq!(
            url,
            "https://my-resource.openai.azure.com/openai/deployments/whisper-prod/audio/transcriptions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn deployment_url_trims_trailing_slash() {
        let url = deployment_url(
            "https://my-resource.openai.azure.com/",
            "gpt4-prod",
            "chat/completions",
        );
        assert!(!url.contains("com//openai"));
        assert!(url.contains("/openai/deployments/gpt4-prod/chat/completions"));
    }
}
