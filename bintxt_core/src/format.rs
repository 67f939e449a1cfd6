/// Suffix appended to a packed file's name.
pub const PACKED_SUFFIX: &str = ".compressed.txt";

/// Name given to a restored file when the upload name carries no suffix.
pub const DEFAULT_RESTORED_NAME: &str = "restored.bin";

/// Payload padding character.
pub const PAD: u8 = b'=';

/// Default codec chunk: 48 KB of raw bytes (64 KB of payload text).
pub const DEFAULT_CHUNK_SIZE: usize = 48 * 1024;

/// Upper bound on any codec chunk. Larger requests are clamped.
pub const MAX_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Read buffer used when streaming through a compressor.
pub const STREAM_BUFFER_SIZE: usize = 64 * 1024;

// ── Artifact names ─────────────────────────────────────────────────────────

/// Download name for a packed payload: `report.pdf` → `report.pdf.compressed.txt`.
pub fn packed_name(original: &str) -> String {
    format!("{}{}", original, PACKED_SUFFIX)
}

/// Download name for restored bytes: strips [`PACKED_SUFFIX`], falling back to
/// [`DEFAULT_RESTORED_NAME`] when the suffix is absent or nothing precedes it.
pub fn restored_name(uploaded: &str) -> String {
    match uploaded.strip_suffix(PACKED_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => DEFAULT_RESTORED_NAME.to_string(),
    }
}
