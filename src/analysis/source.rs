//! Source file reading with legacy-encoding fallback.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Read a source file, decoding UTF-8 first, then Latin-1, then UTF-8
/// with replacement characters.
///
/// Some older solution trees carry Latin-1 encoded files, so a strict
/// UTF-8 read is not enough. Latin-1 maps every byte to a scalar value,
/// which makes the replacement-character arm the terminal safety net.
pub fn read_source(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
    Ok(decode_source(&bytes).into_owned())
}

/// Decode raw bytes following the UTF-8 / Latin-1 / lossy-UTF-8 chain.
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(s);
    }
    if let Some(s) = decode_latin1(bytes) {
        return Cow::Owned(s);
    }
    String::from_utf8_lossy(bytes)
}

/// Latin-1: each byte is its own scalar value.
fn decode_latin1(bytes: &[u8]) -> Option<String> {
    Some(bytes.iter().map(|&b| b as char).collect())
}
