//! Fixed-duration recording from the system default input device.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Sample, SampleFormat, Stream, StreamConfig};

use super::{AudioArtifact, CaptureParameters, write_artifact};
use crate::error::DictationError;

/// Extra wall-clock time allowed past the nominal duration before the
/// stream is considered stalled.
const STALL_GRACE: Duration = Duration::from_secs(5);

/// Poll interval while waiting for the stream to fill.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Capture state filled by the stream callbacks.
#[derive(Default)]
struct CaptureBuffer {
    samples: Vec<i16>,
    error: Option<String>,
}

/// Captures one fixed-duration recording.
///
/// The pipeline records through this trait so tests can substitute a
/// synthetic source for the microphone.
pub trait Recorder: Send + Sync {
    fn record(
        &self,
        params: &CaptureParameters,
        destination: Option<PathBuf>,
    ) -> Result<AudioArtifact, DictationError>;
}

/// Records from the system default input device.
#[derive(Debug, Default)]
pub struct MicrophoneRecorder;

impl Recorder for MicrophoneRecorder {
    fn record(
        &self,
        params: &CaptureParameters,
        destination: Option<PathBuf>,
    ) -> Result<AudioArtifact, DictationError> {
        record(params, destination)
    }
}

/// Record from the default input device for the full duration, blocking.
///
/// Reads frames in arrival order until `ceil(duration * rate / frame_size)`
/// frames have been captured, then encodes them as 16-bit PCM WAV at the
/// destination (a fresh temporary path when none is given). The device
/// handle is scoped to this call and released on every exit path; no file
/// is written unless the full capture succeeded.
pub fn record(
    params: &CaptureParameters,
    destination: Option<PathBuf>,
) -> Result<AudioArtifact, DictationError> {
    params
        .validate()
        .map_err(|reason| DictationError::CaptureIo(anyhow!("invalid capture parameters: {reason}")))?;

    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| DictationError::DeviceUnavailable("no default input device".to_string()))?;

    let config = StreamConfig {
        channels: params.channels,
        sample_rate: params.sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    let target = params.total_samples() as usize;
    let buffer = Arc::new(Mutex::new(CaptureBuffer::default()));

    let sample_format = device
        .default_input_config()
        .map(|c| c.sample_format())
        .unwrap_or(SampleFormat::F32);

    // Stream drop releases the device, so acquisition stays scoped to this
    // function on every exit path.
    let stream = build_stream(&device, &config, sample_format, Arc::clone(&buffer), target)?;
    stream
        .play()
        .map_err(|e| DictationError::DeviceUnavailable(format!("failed to start input stream: {e}")))?;

    let deadline =
        Instant::now() + Duration::from_secs(u64::from(params.duration_secs)) + STALL_GRACE;

    let samples = loop {
        std::thread::sleep(POLL_INTERVAL);

        let state = buffer.lock().unwrap();
        if let Some(message) = &state.error {
            // Frames captured so far are discarded; no partial file.
            return Err(DictationError::CaptureIo(anyhow!(
                "input stream error mid-recording: {message}"
            )));
        }
        if state.samples.len() >= target {
            break state.samples[..target].to_vec();
        }
        if Instant::now() >= deadline {
            return Err(DictationError::CaptureIo(anyhow!(
                "input stream stalled: {} of {} samples after {}s",
                state.samples.len(),
                target,
                params.duration_secs
            )));
        }
    };

    drop(stream);
    write_artifact(params, &samples, destination)
}

/// Build an input stream for whatever sample format the device speaks,
/// converting to i16 for storage.
fn build_stream(
    device: &Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    buffer: Arc<Mutex<CaptureBuffer>>,
    target: usize,
) -> Result<Stream, DictationError> {
    let result = match sample_format {
        SampleFormat::I16 => build_typed::<i16>(device, config, buffer, target),
        SampleFormat::U16 => build_typed::<u16>(device, config, buffer, target),
        _ => build_typed::<f32>(device, config, buffer, target),
    };
    result.map_err(|e| DictationError::DeviceUnavailable(format!("failed to open input stream: {e}")))
}

fn build_typed<T>(
    device: &Device,
    config: &StreamConfig,
    buffer: Arc<Mutex<CaptureBuffer>>,
    target: usize,
) -> anyhow::Result<Stream>
where
    T: cpal::Sample + cpal::SizedSample,
    i16: cpal::FromSample<T>,
{
    let err_buffer = Arc::clone(&buffer);
    let err_fn = move |err: cpal::StreamError| {
        let mut state = err_buffer.lock().unwrap();
        if state.error.is_none() {
            state.error = Some(err.to_string());
        }
    };

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut state = buffer.lock().unwrap();
            if state.error.is_some() || state.samples.len() >= target {
                return;
            }
            state
                .samples
                .extend(data.iter().map(|&s| i16::from_sample(s)));
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// An input device name, flagging the system default.
#[derive(Debug, Clone)]
pub struct InputDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// List all available audio input devices on the system.
pub fn list_input_devices() -> anyhow::Result<Vec<InputDeviceInfo>> {
    let host = cpal::default_host();
    let default_device_name = host
        .default_input_device()
        .and_then(|d| d.description().ok())
        .map(|d| d.to_string());

    let mut devices = Vec::new();
    for device in host.input_devices()? {
        if let Ok(desc) = device.description() {
            let name = desc.to_string();
            devices.push(InputDeviceInfo {
                is_default: default_device_name.as_ref() == Some(&name),
                name,
            });
        }
    }

    if devices.is_empty() {
        anyhow::bail!("No audio input devices found");
    }

    Ok(devices)
}
