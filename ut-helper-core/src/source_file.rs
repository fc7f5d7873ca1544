// reading pattern and source files from disk

use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use std::fs;
use std::path::Path;

/// a file's final path segment and its decoded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub file_name: String,
    pub content: String,
}

pub fn read_text_file(path: &Path) -> Result<LoadedFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;

    Ok(LoadedFile {
        file_name,
        content: decode_text(&bytes),
    })
}

/// decode as utf-8, letting a byte-order mark pick utf-16 when present.
/// invalid sequences become replacement characters
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, encoding_used, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = encoding_used.name(), "file had invalid byte sequences");
    }
    text.into_owned()
}
