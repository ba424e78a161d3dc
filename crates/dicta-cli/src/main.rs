//! dicta: record a short dictation, transcribe it, clean it up with an LLM,
//! and put the result on the clipboard.

mod app;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dicta_core::{ClipboardSink, DEFAULT_TIMEOUT_SECS, DictationPipeline, set_verbose};

#[derive(Parser)]
#[command(name = "dicta", about = "Voice dictation with LLM cleanup", version)]
struct Cli {
    /// Profile to run with
    #[arg(long, value_enum, default_value_t = config::ProfileName::Enterprise)]
    profile: config::ProfileName,

    /// Recording duration in seconds (overrides the profile)
    #[arg(long)]
    duration: Option<u32>,

    /// Keep the recording at this path instead of a temporary file
    #[arg(long)]
    output: Option<PathBuf>,

    /// List audio input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    set_verbose(cli.verbose);

    if cli.list_devices {
        return app::print_input_devices();
    }

    let mut profile = config::resolve_profile(cli.profile)?;
    if let Some(duration) = cli.duration {
        profile.capture.duration_secs = duration;
    }

    app::print_banner(&profile);

    let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
    let backend = dicta_core::for_profile(&profile, Some(timeout))?;
    let pipeline = DictationPipeline::new(&profile, backend);

    let mut sink = ClipboardSink;
    let text = pipeline.run(cli.output.clone(), &mut sink).await?;

    println!("\n✓ Cleaned text copied to clipboard!");
    println!("\n{text}");

    if let Some(path) = &cli.output {
        println!("\nRecording kept at: {}", path.display());
    }

    Ok(())
}
