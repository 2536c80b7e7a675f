// src/process/encoding.rs

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::layout::SourceEncoding;

/// Raised when a source file contains byte sequences that are not valid in
/// its declared encoding. The pipeline never substitutes replacement
/// characters; bad input aborts the step.
#[derive(Debug, Error)]
#[error("{source_name}: input is not valid {encoding}")]
pub struct EncodingError {
    pub source_name: String,
    pub encoding: &'static str,
}

fn codec(encoding: SourceEncoding) -> &'static Encoding {
    match encoding {
        SourceEncoding::Utf8 => UTF_8,
        // The census "ISO-8859" label resolves to the windows-1252 codec,
        // matching how the files are actually encoded.
        SourceEncoding::Latin1 => WINDOWS_1252,
    }
}

/// Decode `bytes` from the declared legacy encoding into UTF-8 text.
pub fn decode_bytes(
    bytes: &[u8],
    encoding: SourceEncoding,
    source_name: &str,
) -> Result<String, EncodingError> {
    let codec = codec(encoding);
    let (text, had_errors) = codec.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(EncodingError {
            source_name: source_name.to_string(),
            encoding: codec.name(),
        });
    }
    Ok(text.into_owned())
}

/// Read `path` and normalize it to UTF-8 text.
pub fn decode_file(path: &Path, encoding: SourceEncoding) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("reading source file {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(decode_bytes(&bytes, encoding, &name)?)
}
