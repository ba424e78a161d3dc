//! WAV encoding for captured PCM samples.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

use super::CaptureParameters;

/// Write 16-bit linear PCM samples to a WAV file whose header matches the
/// capture parameters.
pub(super) fn write_wav(path: &Path, params: &CaptureParameters, samples: &[i16]) -> Result<()> {
    let spec = WavSpec {
        channels: params.channels,
        sample_rate: params.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(())
}
