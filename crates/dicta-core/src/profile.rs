//! Resolved operating profiles.
//!
//! A profile bundles everything one pipeline run needs: which backend to
//! talk to, which models (or deployments) to address, the credentials for
//! that backend, and the capture parameters. Profiles arrive fully resolved;
//! this crate never reads the process environment itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audio::CaptureParameters;
use crate::error::DictationError;

/// Which provider backend a profile routes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    OpenAi,
    Azure,
}

impl BackendKind {
    /// Get the string identifier for this backend
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "openai",
            BackendKind::Azure => "azure",
        }
    }

    /// Human-readable display name for this backend
    pub fn display_name(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "OpenAI",
            BackendKind::Azure => "Azure OpenAI",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credentials for whichever backend the profile selects.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// API key: bearer token for OpenAI, `api-key` header value for Azure.
    pub api_key: String,

    /// Azure resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    /// Unused by the OpenAI backend.
    pub endpoint: Option<String>,
}

/// A fully-resolved operating context for one pipeline run.
///
/// Immutable once constructed; `validate()` must pass before any network
/// call is made on its behalf.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub backend: BackendKind,

    /// Model name (OpenAI) or deployment name (Azure) for speech-to-text.
    pub transcription_model: String,

    /// Model name (OpenAI) or deployment name (Azure) for transcript cleanup.
    pub cleanup_model: String,

    pub credentials: Credentials,
    pub capture: CaptureParameters,
}

impl Profile {
    /// Check that the profile carries everything its backend needs.
    pub fn validate(&self) -> Result<(), DictationError> {
        if self.credentials.api_key.trim().is_empty() {
            return Err(self.invalid("missing API key"));
        }
        if self.transcription_model.trim().is_empty() {
            return Err(self.invalid("missing transcription model"));
        }
        if self.cleanup_model.trim().is_empty() {
            return Err(self.invalid("missing cleanup model"));
        }

        if self.backend == BackendKind::Azure {
            let endpoint = self
                .credentials
                .endpoint
                .as_deref()
                .map(str::trim)
                .unwrap_or("");
            if endpoint.is_empty() {
                return Err(self.invalid("azure backend requires an endpoint"));
            }
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(self.invalid(&format!(
                    "azure endpoint must start with http:// or https://, got: {endpoint}"
                )));
            }
        }

        self.capture
            .validate()
            .map_err(|reason| self.invalid(&reason))
    }

    fn invalid(&self, reason: &str) -> DictationError {
        DictationError::InvalidProfile {
            profile: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_profile() -> Profile {
        Profile {
            name: "personal".to_string(),
            backend: BackendKind::OpenAi,
            transcription_model: "whisper-1".to_string(),
            cleanup_model: "gpt-4".to_string(),
            credentials: Credentials {
                api_key: "sk-test".to_string(),
                endpoint: None,
            },
            capture: CaptureParameters::default(),
        }
    }

    #[test]
    fn valid_openai_profile_passes() {
        assert!(openai_profile().validate().is_ok());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let mut profile = openai_profile();
        profile.credentials.api_key = "  ".to_string();
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, DictationError::InvalidProfile { .. }));
    }

    #[test]
    fn azure_profile_requires_endpoint() {
        let mut profile = openai_profile();
        profile.backend = BackendKind::Azure;
        assert!(profile.validate().is_err());

        profile.credentials.endpoint = Some("my-resource.openai.azure.com".to_string());
        assert!(profile.validate().is_err(), "scheme-less endpoint accepted");

        profile.credentials.endpoint = Some("https://my-resource.openai.azure.com".to_string());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn zero_duration_capture_is_rejected() {
        let mut profile = openai_profile();
        profile.capture.duration_secs = 0;
        assert!(profile.validate().is_err());
    }
}
