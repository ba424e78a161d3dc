//! Environment-based profile resolution.
//!
//! The core library never touches the process environment; everything a run
//! needs is resolved here into an immutable `Profile` before the pipeline
//! starts. Variables are scoped per profile (`OPENAI_API_KEY_ENTERPRISE`,
//! `USE_AZURE_PERSONAL`, ...), with `OPENAI_API_KEY` as the personal
//! profile's fallback key.

use std::fmt;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use dicta_core::{BackendKind, CaptureParameters, Credentials, Profile};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_OPENAI_AUDIO_MODEL: &str = "whisper-1";
const DEFAULT_DURATION_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileName {
    Enterprise,
    Personal,
}

impl ProfileName {
    fn as_str(self) -> &'static str {
        match self {
            ProfileName::Enterprise => "enterprise",
            ProfileName::Personal => "personal",
        }
    }

    fn env_suffix(self) -> &'static str {
        match self {
            ProfileName::Enterprise => "ENTERPRISE",
            ProfileName::Personal => "PERSONAL",
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn scoped(prefix: &str, name: ProfileName) -> Option<String> {
    env(&format!("{prefix}_{}", name.env_suffix()))
}

fn required(prefix: &str, name: ProfileName) -> Result<String> {
    scoped(prefix, name).ok_or_else(|| {
        anyhow!(
            "{prefix}_{} is not set. Add it to your environment or .env file.",
            name.env_suffix()
        )
    })
}

/// Resolve a fully-validated profile from the environment.
pub fn resolve_profile(name: ProfileName) -> Result<Profile> {
    // A .env file is optional; real environment variables win either way.
    dotenvy::dotenv().ok();

    let use_azure = scoped("USE_AZURE", name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let duration_secs = match scoped("RECORDING_DURATION", name) {
        Some(value) => value.parse().with_context(|| {
            format!(
                "RECORDING_DURATION_{} must be a positive integer, got: {value}",
                name.env_suffix()
            )
        })?,
        None => DEFAULT_DURATION_SECS,
    };
    let capture = CaptureParameters {
        duration_secs,
        ..CaptureParameters::default()
    };

    let profile = if use_azure {
        Profile {
            name: name.as_str().to_string(),
            backend: BackendKind::Azure,
            transcription_model: required("AZURE_AUDIO_DEPLOYMENT_NAME", name)?,
            cleanup_model: required("AZURE_DEPLOYMENT_NAME", name)?,
            credentials: Credentials {
                api_key: required("AZURE_OPENAI_API_KEY", name)?,
                endpoint: Some(required("AZURE_OPENAI_ENDPOINT", name)?),
            },
            capture,
        }
    } else {
        let api_key = match name {
            // The personal profile also honors the unscoped key.
            ProfileName::Personal => scoped("OPENAI_API_KEY", name).or_else(|| env("OPENAI_API_KEY")),
            ProfileName::Enterprise => scoped("OPENAI_API_KEY", name),
        }
        .ok_or_else(|| {
            anyhow!(
                "OPENAI_API_KEY_{} is not set. Add it to your environment or .env file.",
                name.env_suffix()
            )
        })?;

        Profile {
            name: name.as_str().to_string(),
            backend: BackendKind::OpenAi,
            transcription_model: scoped("OPENAI_AUDIO_MODEL", name)
                .unwrap_or_else(|| DEFAULT_OPENAI_AUDIO_MODEL.to_string()),
            cleanup_model: scoped("OPENAI_MODEL", name)
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            credentials: Credentials {
                api_key,
                endpoint: None,
            },
            capture,
        }
    };

    profile.validate()?;
    Ok(profile)
}
