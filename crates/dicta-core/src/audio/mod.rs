//! Audio capture: fixed-duration recording from the default input device.

mod capture;
mod encode;

pub use capture::{InputDeviceInfo, MicrophoneRecorder, Recorder, list_input_devices, record};

use std::path::PathBuf;

use crate::error::DictationError;

/// Parameters for one fixed-duration capture.
///
/// Immutable once capture begins. The frame-read count is
/// `ceil(duration_secs * sample_rate / frame_size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureParameters {
    /// Sample rate in Hz (16000 is good for speech)
    pub sample_rate: u32,
    /// Number of audio channels (1 for mono, 2 for stereo)
    pub channels: u16,
    /// Samples per frame read
    pub frame_size: u32,
    /// Recording duration in seconds
    pub duration_secs: u32,
}

impl Default for CaptureParameters {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            frame_size: 1024,
            duration_secs: 10,
        }
    }
}

impl CaptureParameters {
    /// Number of frame reads needed to cover the full duration.
    pub fn frame_reads(&self) -> u64 {
        let total = u64::from(self.duration_secs) * u64::from(self.sample_rate);
        total.div_ceil(u64::from(self.frame_size))
    }

    /// Total sample count across all channels for a full capture.
    pub fn total_samples(&self) -> u64 {
        self.frame_reads() * u64::from(self.frame_size) * u64::from(self.channels)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".to_string());
        }
        if self.channels == 0 {
            return Err("channel count must be positive".to_string());
        }
        if self.frame_size == 0 {
            return Err("frame size must be positive".to_string());
        }
        if self.duration_secs == 0 {
            return Err("recording duration must be positive".to_string());
        }
        Ok(())
    }
}

/// Handle to one captured recording on disk.
///
/// Exactly one artifact is live per pipeline run. The pipeline deletes it
/// after processing unless the caller supplied the destination, in which
/// case the caller owns deletion.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub params: CaptureParameters,

    /// True when the caller chose the destination path.
    pub retained: bool,
}

impl AudioArtifact {
    /// File name to present to the transcription endpoint.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording.wav")
            .to_string()
    }
}

/// Encode captured samples into a WAV artifact.
///
/// Writes to `destination` when given (the artifact is then retained for the
/// caller), otherwise to a fresh unique path under the system temp directory.
pub fn write_artifact(
    params: &CaptureParameters,
    samples: &[i16],
    destination: Option<PathBuf>,
) -> Result<AudioArtifact, DictationError> {
    let (path, retained) = match destination {
        Some(path) => (path, true),
        None => (temp_wav_path(), false),
    };

    encode::write_wav(&path, params, samples).map_err(DictationError::CaptureIo)?;

    Ok(AudioArtifact {
        path,
        params: params.clone(),
        retained,
    })
}

/// Delete an artifact's backing file.
///
/// An already-removed file is reported via verbose logging and treated as
/// success.
pub fn cleanup_artifact(artifact: &AudioArtifact) -> Result<(), DictationError> {
    match std::fs::remove_file(&artifact.path) {
        Ok(()) => {
            crate::verbose!("removed recording {}", artifact.path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            crate::verbose!("recording {} already removed", artifact.path.display());
            Ok(())
        }
        Err(e) => Err(DictationError::CaptureIo(anyhow::Error::new(e).context(
            format!("Failed to remove recording {}", artifact.path.display()),
        ))),
    }
}

fn temp_wav_path() -> PathBuf {
    let unique = format!(
        "dicta_{}_{}.wav",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    std::env::temp_dir().join(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_second_mono() -> CaptureParameters {
        CaptureParameters {
            sample_rate: 16_000,
            channels: 1,
            frame_size: 1024,
            duration_secs: 1,
        }
    }

    #[test]
    fn frame_reads_round_up() {
        let params = one_second_mono();
        // 16000 / 1024 = 15.625, so a full second needs 16 reads
        assert_eq!(params.frame_reads(), 16);
        assert_eq!(params.total_samples(), 16 * 1024);
    }

    #[test]
    fn frame_reads_exact_division() {
        let params = CaptureParameters {
            sample_rate: 16_000,
            channels: 2,
            frame_size: 800,
            duration_secs: 2,
        };
        assert_eq!(params.frame_reads(), 40);
        assert_eq!(params.total_samples(), 40 * 800 * 2);
    }

    #[test]
    fn written_artifact_header_matches_parameters() {
        let params = one_second_mono();
        let samples = vec![0i16; params.total_samples() as usize];
        let artifact = write_artifact(&params, &samples, None).unwrap();

        let reader = hound::WavReader::open(&artifact.path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, params.sample_rate);
        assert_eq!(spec.channels, params.channels);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(u64::from(reader.len()), params.total_samples());

        cleanup_artifact(&artifact).unwrap();
    }

    #[test]
    fn caller_destination_is_retained() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("take.wav");
        let params = one_second_mono();
        let artifact = write_artifact(&params, &[0i16; 1024], Some(dest.clone())).unwrap();
        assert!(artifact.retained);
        assert_eq!(artifact.path, dest);
    }

    #[test]
    fn cleanup_tolerates_missing_file() {
        let artifact = AudioArtifact {
            path: std::env::temp_dir().join("dicta_never_existed.wav"),
            params: one_second_mono(),
            retained: false,
        };
        assert!(cleanup_artifact(&artifact).is_ok());
    }

    #[test]
    fn cleanup_is_safe_to_repeat() {
        let params = one_second_mono();
        let artifact = write_artifact(&params, &[0i16; 256], None).unwrap();
        cleanup_artifact(&artifact).unwrap();
        assert!(!artifact.path.exists());
        cleanup_artifact(&artifact).unwrap();
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut params = one_second_mono();
        params.frame_size = 0;
        assert!(params.validate().is_err());
    }
}
