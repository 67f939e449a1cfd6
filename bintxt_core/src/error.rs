use std::io;

use thiserror::Error;

/// Failure of a pack or restore run.
///
/// Each variant maps to one stage of the pipeline, so a caller can tell a bad
/// upload apart from a broken compressed stream without parsing messages.
#[derive(Error, Debug)]
pub enum PackError {
    /// The compressor rejected or could not process the input bytes.
    #[error("compression failed: {0}")]
    CompressionFailure(#[source] io::Error),

    /// The uploaded text is not a payload produced by `text::encode`.
    #[error("malformed text payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// The decoded bytes are not a valid stream for the configured compressor.
    #[error("invalid compressed stream: {0}")]
    InvalidCompressedStream(#[source] io::Error),

    /// A run was triggered without an input file.
    #[error("no file selected")]
    NoFileSelected,

    /// Reading the selected file failed before any stage could run.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PackError {
    /// `false` for outcomes the user should not be shown as an error.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, PackError::NoFileSelected)
    }

    pub(crate) fn invalid_stream(msg: &'static str) -> Self {
        PackError::InvalidCompressedStream(io::Error::new(io::ErrorKind::InvalidData, msg))
    }
}

/// Structural problem found while decoding a text payload.
///
/// Offsets are byte offsets into the whole payload, not into a chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("invalid character {byte:#04x} at offset {offset}")]
    InvalidCharacter { offset: usize, byte: u8 },

    #[error("payload length {0} is not a multiple of 4")]
    InvalidLength(usize),

    #[error("misplaced padding at offset {offset}")]
    InvalidPadding { offset: usize },

    #[error("non-canonical final symbol at offset {offset}")]
    NonCanonical { offset: usize },

    #[error("payload is not valid UTF-8 text")]
    NotText,
}
