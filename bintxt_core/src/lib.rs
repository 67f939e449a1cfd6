pub mod compressor;
pub mod error;
pub mod format;
pub mod session;
pub mod text;

pub use compressor::Compressor;
pub use error::{PackError, PayloadError};
pub use format::{packed_name, restored_name, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, PACKED_SUFFIX};
pub use session::{Direction, PackedText, RestoredFile, SelectedFile, Session, Status};
