pub mod audio;
#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod provider;
pub mod verbose;

pub use audio::{
    AudioArtifact, CaptureParameters, InputDeviceInfo, MicrophoneRecorder, Recorder,
    cleanup_artifact, list_input_devices, record,
};
#[cfg(feature = "clipboard")]
pub use clipboard::{ClipboardSink, copy_to_clipboard};
pub use error::DictationError;
pub use pipeline::{DictationPipeline, PipelineFailure, Stage, TextSink};
pub use profile::{BackendKind, Credentials, Profile};
pub use provider::{DEFAULT_TIMEOUT_SECS, ProviderBackend, for_profile};
pub use verbose::set_verbose;
