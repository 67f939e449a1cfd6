//! Binary-to-text codec for payloads.
//!
//! Bytes map onto the standard 64-symbol base64 alphabet with `=` padding.
//! Both directions work chunk by chunk so that peak memory stays bounded;
//! chunks are aligned to whole 3-byte / 4-character groups, which makes the
//! chunked output identical to a single-shot encode of the same input.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine};

use crate::error::PayloadError;
use crate::format::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, PAD};

/// Round a requested chunk size down to whole 3-byte groups, within
/// `3..=MAX_CHUNK_SIZE`.
fn byte_chunk(requested: usize) -> usize {
    (requested.min(MAX_CHUNK_SIZE) / 3 * 3).max(3)
}

/// Round a requested chunk size down to whole 4-character groups, within
/// `4..=MAX_CHUNK_SIZE / 3 * 4`.
fn char_chunk(requested: usize) -> usize {
    (requested.min(MAX_CHUNK_SIZE / 3 * 4) / 4 * 4).max(4)
}

/// Encode `bytes` using [`DEFAULT_CHUNK_SIZE`].
pub fn encode(bytes: &[u8]) -> String {
    encode_with_chunk_size(bytes, DEFAULT_CHUNK_SIZE)
}

/// Encode `bytes`, processing at most `chunk_size` input bytes at a time.
///
/// The chunk size only affects throughput and peak memory; the returned text
/// is the same for every value.
pub fn encode_with_chunk_size(bytes: &[u8], chunk_size: usize) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(byte_chunk(chunk_size)) {
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

/// Decode a payload produced by [`encode`].
pub fn decode(text: &str) -> Result<Vec<u8>, PayloadError> {
    decode_with_chunk_size(text, DEFAULT_CHUNK_SIZE / 3 * 4)
}

/// Decode `text`, processing at most `chunk_chars` characters at a time.
///
/// Rejects characters outside the alphabet, a total length that is not a
/// multiple of 4, padding anywhere but the end, and non-zero trailing bits.
pub fn decode_with_chunk_size(text: &str, chunk_chars: usize) -> Result<Vec<u8>, PayloadError> {
    let input = text.as_bytes();
    if input.len() % 4 != 0 {
        return Err(PayloadError::InvalidLength(input.len()));
    }

    let mut out = Vec::with_capacity(input.len() / 4 * 3);
    let mut offset = 0usize;
    for chunk in input.chunks(char_chunk(chunk_chars)) {
        let is_last = offset + chunk.len() == input.len();
        // Each chunk is valid on its own, so padding inside a middle chunk
        // would otherwise slip through.
        if !is_last {
            if let Some(pos) = chunk.iter().position(|&b| b == PAD) {
                return Err(PayloadError::InvalidPadding {
                    offset: offset + pos,
                });
            }
        }
        STANDARD
            .decode_vec(chunk, &mut out)
            .map_err(|e| payload_error(e, offset, chunk.len()))?;
        offset += chunk.len();
    }
    Ok(out)
}

/// Translate an engine error on the chunk starting at `base`.
fn payload_error(err: DecodeError, base: usize, chunk_len: usize) -> PayloadError {
    match err {
        DecodeError::InvalidByte(pos, byte) if byte == PAD => PayloadError::InvalidPadding {
            offset: base + pos,
        },
        DecodeError::InvalidByte(pos, byte) => PayloadError::InvalidCharacter {
            offset: base + pos,
            byte,
        },
        DecodeError::InvalidLength(_) => PayloadError::InvalidLength(base + chunk_len),
        DecodeError::InvalidLastSymbol(pos, _) => PayloadError::NonCanonical { offset: base + pos },
        DecodeError::InvalidPadding => PayloadError::InvalidPadding {
            offset: base + chunk_len,
        },
    }
}

/// Streaming encoder: bytes written in, payload text written out.
///
/// # Write contract
/// Call [`Write::write`] any number of times with arbitrary-sized slices.
/// Whole chunks are encoded as soon as they fill up; the trailing partial
/// group is held back until [`TextWriter::finish`], which applies padding.
/// Dropping the writer without calling `finish` loses that tail.
pub struct TextWriter<W: Write> {
    inner: W,
    chunk_size: usize,
    /// Raw bytes not yet encoded.
    pending: Vec<u8>,
    scratch: String,
    chars_written: u64,
}

impl<W: Write> TextWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
    }

    /// `chunk_size` is clamped to [`MAX_CHUNK_SIZE`] and rounded down to a
    /// multiple of 3 (minimum 3).
    pub fn with_chunk_size(inner: W, chunk_size: usize) -> Self {
        let chunk_size = byte_chunk(chunk_size);
        Self {
            inner,
            chunk_size,
            pending: Vec::with_capacity(chunk_size * 2),
            scratch: String::with_capacity(chunk_size / 3 * 4),
            chars_written: 0,
        }
    }

    /// Number of payload characters emitted so far.
    pub fn chars_written(&self) -> u64 {
        self.chars_written
    }

    /// Encode the first `len` pending bytes and pass them to the sink.
    fn emit(&mut self, len: usize) -> io::Result<()> {
        self.scratch.clear();
        STANDARD.encode_string(&self.pending[..len], &mut self.scratch);
        self.inner.write_all(self.scratch.as_bytes())?;
        self.chars_written += self.scratch.len() as u64;
        self.pending.drain(..len);
        Ok(())
    }

    /// Encode the remaining bytes with padding and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            let len = self.pending.len();
            self.emit(len)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for TextWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while self.pending.len() >= self.chunk_size {
            self.emit(self.chunk_size)?;
        }
        Ok(buf.len())
    }

    /// Flushes the sink only; a partial group cannot be emitted before `finish`.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
