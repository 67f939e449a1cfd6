use std::io::{self, BufRead, Read, Write};

use crate::error::PackError;
use crate::format::STREAM_BUFFER_SIZE;

/// Core compression abstraction.
///
/// Each `Compressor` implementation:
/// - Wraps a standard streaming lossless algorithm; the algorithm itself is
///   never reimplemented here.
/// - Must produce a self-delimiting stream, since the payload carries no
///   length or header of its own.
/// - Reports failures with the pipeline taxonomy: encoder errors are
///   `CompressionFailure`, anything wrong with the input to decompression is
///   `InvalidCompressedStream`, sink/source errors are `Io`.
pub trait Compressor: Send + Sync {
    /// Human-readable name for CLI display and logs.
    fn name(&self) -> &'static str;

    /// Stream `src` through the compressor into `dst`.
    ///
    /// Returns the number of raw bytes consumed. Empty input yields the
    /// algorithm's canonical empty stream.
    fn compress_stream(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64, PackError>;

    /// Stream a compressed stream from `src` into `dst` as raw bytes.
    ///
    /// Returns the number of bytes restored.
    fn decompress_stream(
        &self,
        src: &mut dyn BufRead,
        dst: &mut dyn Write,
    ) -> Result<u64, PackError>;

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, PackError> {
        let mut src = raw;
        let mut out = Vec::new();
        self.compress_stream(&mut src, &mut out)?;
        Ok(out)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, PackError> {
        let mut src = compressed;
        let mut out = Vec::new();
        self.decompress_stream(&mut src, &mut out)?;
        Ok(out)
    }
}

/// Copy `src` into an encoder in fixed-size reads.
///
/// Read errors are reported as `Io`, encoder errors as `CompressionFailure`.
pub fn feed_encoder(src: &mut dyn Read, encoder: &mut dyn Write) -> Result<u64, PackError> {
    let mut buf = vec![0u8; STREAM_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PackError::Io(e)),
        };
        encoder
            .write_all(&buf[..n])
            .map_err(PackError::CompressionFailure)?;
        total += n as u64;
    }
    Ok(total)
}

/// Copy everything a decoder yields into `dst`.
///
/// Decoder errors are reported as `InvalidCompressedStream`, sink errors as `Io`.
pub fn drain_decoder(decoder: &mut dyn Read, dst: &mut dyn Write) -> Result<u64, PackError> {
    let mut buf = vec![0u8; STREAM_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match decoder.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PackError::InvalidCompressedStream(e)),
        };
        dst.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

/// Reject a zero-length compressed stream up front.
///
/// Every supported algorithm emits at least a header for empty input, so an
/// empty source is never valid.
pub fn ensure_not_empty(src: &mut dyn BufRead) -> Result<(), PackError> {
    let buffered = src.fill_buf().map_err(PackError::InvalidCompressedStream)?;
    if buffered.is_empty() {
        return Err(PackError::invalid_stream("empty compressed stream"));
    }
    Ok(())
}

/// Reject bytes left over after the decoder reached the end of its stream.
pub fn ensure_exhausted(rest: &mut dyn BufRead) -> Result<(), PackError> {
    let buffered = rest.fill_buf().map_err(PackError::InvalidCompressedStream)?;
    if !buffered.is_empty() {
        return Err(PackError::invalid_stream(
            "trailing data after end of compressed stream",
        ));
    }
    Ok(())
}
