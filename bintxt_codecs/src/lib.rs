mod gzip_codec;
mod zstd_codec;

pub use gzip_codec::GzipCompressor;
pub use zstd_codec::ZstdCompressor;

use bintxt_core::Compressor;

/// Name of the compressor used when none is configured.
pub const DEFAULT_COMPRESSOR: &str = "gzip";

/// Resolve a compressor from its configured name.
///
/// Both directions must be configured with the same name; payloads carry no
/// marker of the algorithm that produced them.
pub fn compressor_by_name(name: &str) -> anyhow::Result<Box<dyn Compressor>> {
    match name {
        "gzip" | "gz" => Ok(Box::new(GzipCompressor)),
        "zstd" | "zst" => Ok(Box::new(ZstdCompressor)),
        other => anyhow::bail!("unknown compressor '{}'. Valid options: gzip, zstd", other),
    }
}
