pub mod annotate;
pub mod diff;

pub use annotate::{annotate, AnnotateArgs};
pub use diff::{diff, DiffArgs};

use anyhow::{Context, Result};
use std::io::Read;

/// Read the corrected text from a file, or stdin for `-`.
///
/// A trailing line break is dropped so that files ending in a newline
/// do not change the last word.
pub fn read_corrected(source: &str) -> Result<String> {
    let mut text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read corrected text from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read corrected text from {}", source))?
    };

    let trimmed = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed);
    Ok(text)
}
