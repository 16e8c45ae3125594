//! File helpers for text and JSON documents
//!
//! Thin wrappers over `std::fs`; IO errors are returned with their original
//! kind so callers can tell not-found from permission problems.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;

const JSON_INDENT: &[u8] = b"    ";

/// Write `text` to `path`, replacing any existing content
pub fn write_text(path: impl AsRef<Path>, text: &str) -> Result<()> {
    fs::write(path, text)?;
    Ok(())
}

/// Read the whole file at `path` as UTF-8
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write `data` as pretty-printed JSON with a 4-space indent.
///
/// Non-ASCII characters are written as-is, not `\u` escaped.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    data.serialize(&mut serializer)?;

    let mut file = fs::File::create(path)?;
    file.write_all(&buf)?;
    Ok(())
}

/// Read and parse the JSON document at `path`
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
