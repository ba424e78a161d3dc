//! Clipboard publishing.

use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::pipeline::TextSink;

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to copy text to clipboard")?;

    Ok(())
}

/// A `TextSink` that publishes to the system clipboard.
#[derive(Debug, Default)]
pub struct ClipboardSink;

impl TextSink for ClipboardSink {
    fn publish(&mut self, text: &str) -> Result<()> {
        copy_to_clipboard(text)
    }
}
