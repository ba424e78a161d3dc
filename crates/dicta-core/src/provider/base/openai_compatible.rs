//! Shared request helpers for OpenAI-compatible APIs.
//!
//! Both backends speak the same wire format:
//! - Multipart form upload with a `file` field for transcription
//! - Chat-completions JSON for cleanup
//! - JSON responses with a `text` field / `choices` array
//!
//! They differ only in the auth header and in whether the model rides in
//! the request body (OpenAI) or in the URL as a deployment name (Azure).

use anyhow::{Context, Result};
use serde::Deserialize;

/// How a backend authenticates its requests.
#[derive(Debug, Clone)]
pub(crate) enum Auth {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `api-key: <key>` (Azure)
    ApiKey(String),
}

impl Auth {
    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {token}")),
            Auth::ApiKey(key) => request.header("api-key", key.clone()),
        }
    }
}

/// Response structure for transcription endpoints. Richer fields in the
/// backend response are ignored; only the text is kept.
#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// POST audio bytes to a transcription endpoint and return the transcript.
///
/// `model_field` is included as a multipart `model` field when given
/// (OpenAI-style flat addressing); Azure addresses the deployment in the
/// URL instead and passes `None`.
pub(crate) async fn transcribe_request(
    client: &reqwest::Client,
    api_url: &str,
    auth: &Auth,
    model_field: Option<&str>,
    audio_data: Vec<u8>,
    filename: String,
) -> Result<String> {
    let mut form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(audio_data)
            .file_name(filename)
            .mime_str("audio/wav")?,
    );
    if let Some(model) = model_field {
        form = form.text("model", model.to_string());
    }

    let response = auth
        .apply(client.post(api_url))
        .multipart(form)
        .send()
        .await
        .context("Failed to send request")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        anyhow::bail!("API error ({status}): {error_text}");
    }

    let resp: TranscriptionResponse = response
        .json()
        .await
        .context("Failed to parse API response")?;
    Ok(resp.text)
}

/// POST a two-message chat request and return the first completion's text,
/// trimmed of surrounding whitespace.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn chat_request(
    client: &reqwest::Client,
    api_url: &str,
    auth: &Auth,
    model_field: Option<&str>,
    system_prompt: &str,
    user_prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> Result<String> {
    let mut body = serde_json::json!({
        "messages": [
            {"role": "system", "content": system_prompt},
            {"role": "user", "content": user_prompt}
        ],
        "temperature": temperature,
        "max_tokens": max_tokens,
    });
    if let Some(model) = model_field {
        body["model"] = serde_json::Value::String(model.to_string());
    }

    let response = auth
        .apply(client.post(api_url))
        .json(&body)
        .send()
        .await
        .context("Failed to send request")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        anyhow::bail!("API error ({status}): {error_text}");
    }

    let resp: ChatResponse = response
        .json()
        .await
        .context("Failed to parse API response")?;
    resp.choices
        .first()
        .map(|c| c.message.content.trim().to_string())
        .ok_or_else(|| anyhow::anyhow!("No completion in response"))
}
