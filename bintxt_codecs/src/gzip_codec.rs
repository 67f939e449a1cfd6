use std::io::{BufRead, Read, Write};

use bintxt_core::compressor::{drain_decoder, ensure_exhausted, ensure_not_empty, feed_encoder};
use bintxt_core::{Compressor, PackError};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Gzip (deflate) compressor at the default level.
///
/// The default for payloads: gzip streams are what browsers and most tools
/// produce and accept, so a payload can be restored elsewhere with
/// `base64 -d | gunzip`.
///
/// A payload holds exactly one gzip member. Bytes after it are rejected
/// rather than silently ignored.
pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress_stream(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64, PackError> {
        let mut encoder = GzEncoder::new(dst, Compression::default());
        let total = feed_encoder(src, &mut encoder)?;
        encoder.finish().map_err(PackError::CompressionFailure)?;
        Ok(total)
    }

    fn decompress_stream(
        &self,
        src: &mut dyn BufRead,
        dst: &mut dyn Write,
    ) -> Result<u64, PackError> {
        ensure_not_empty(src)?;
        let mut decoder = GzDecoder::new(src);
        let total = drain_decoder(&mut decoder, dst)?;
        ensure_exhausted(decoder.into_inner())?;
        Ok(total)
    }
}
