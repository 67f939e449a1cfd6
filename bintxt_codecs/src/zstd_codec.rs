use std::io::{BufRead, Read, Write};

use bintxt_core::compressor::{drain_decoder, ensure_not_empty, feed_encoder};
use bintxt_core::{Compressor, PackError};

/// Zstandard compressor at zstd's default level.
///
/// Smaller payloads and faster restores than gzip for most inputs, but the
/// payload can only be restored by a zstd-aware tool.
pub struct ZstdCompressor;

impl Compressor for ZstdCompressor {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress_stream(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64, PackError> {
        let mut encoder = zstd::stream::write::Encoder::new(dst, zstd::DEFAULT_COMPRESSION_LEVEL)
            .map_err(PackError::CompressionFailure)?;
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
        // The decoder reads frame after frame until the source ends, so any
        // trailing garbage surfaces as a frame error here.
        let mut decoder = zstd::stream::read::Decoder::with_buffer(src)
            .map_err(PackError::InvalidCompressedStream)?;
        drain_decoder(&mut decoder, dst)
    }
}
