use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info, warn};

use crate::compressor::Compressor;
use crate::error::{PackError, PayloadError};
use crate::format::{packed_name, restored_name, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, PAD};
use crate::text::{self, TextWriter};

// ── Inputs and artifacts ───────────────────────────────────────────────────

/// A file picked by the user: a display name plus where its bytes live.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl SelectedFile {
    /// Select a file on disk. Its name is the last path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: Source::Path(path),
        }
    }

    /// Select bytes already in memory (stdin, tests, embedders).
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: Source::Memory(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.source {
            Source::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            Source::Memory(bytes) => Ok(Box::new(bytes.as_slice())),
        }
    }

    /// Read the whole file into memory.
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self.source {
            Source::Path(path) => fs::read(path),
            Source::Memory(bytes) => Ok(bytes),
        }
    }
}

/// Result of the compress direction: the payload and its download name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedText {
    pub file_name: String,
    pub text: String,
    /// Size of the original file in bytes.
    pub raw_len: u64,
}

impl PackedText {
    /// Size of the compressed stream the payload represents.
    pub fn compressed_len(&self) -> u64 {
        let padding = self.text.bytes().rev().take_while(|&b| b == PAD).count();
        (self.text.len() / 4 * 3 - padding) as u64
    }
}

/// Result of the restore direction: the recovered bytes and their download name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ── Per-direction state ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Success,
    Failed,
}

/// State record for one direction of the pipeline.
///
/// Holds the latest successful result and the latest error message. Whether a
/// failure clears the previous result is fixed per direction.
#[derive(Debug)]
pub struct Direction<T> {
    label: &'static str,
    status: Status,
    result: Option<T>,
    error: Option<String>,
    keep_result_on_failure: bool,
}

impl<T> Direction<T> {
    fn new(label: &'static str, keep_result_on_failure: bool) -> Self {
        Self {
            label,
            status: Status::Idle,
            result: None,
            error: None,
            keep_result_on_failure,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The latest successful result, if one is still offered.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Human-readable message of the latest failure, until dismissed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Acknowledge a failure and return to `Idle`.
    pub fn dismiss_error(&mut self) {
        if self.status == Status::Failed {
            self.error = None;
            self.set_status(Status::Idle);
        }
    }

    fn set_status(&mut self, next: Status) {
        debug!("{}: {:?} -> {:?}", self.label, self.status, next);
        self.status = next;
    }

    fn begin(&mut self) {
        self.error = None;
        self.set_status(Status::Running);
    }

    fn succeed(&mut self, value: T) -> &T {
        self.set_status(Status::Success);
        self.result.insert(value)
    }

    fn fail(&mut self, err: &PackError) {
        warn!("{} failed: {}", self.label, err);
        self.error = Some(err.to_string());
        if !self.keep_result_on_failure {
            self.result = None;
        }
        self.set_status(Status::Failed);
    }
}

// ── Session ────────────────────────────────────────────────────────────────

/// Orchestrates the compress and restore pipelines for one user session.
///
/// Runs borrow the session mutably, so a second run on the same session
/// cannot start while one is in flight.
pub struct Session {
    compressor: Box<dyn Compressor>,
    chunk_size: usize,
    packed: Direction<PackedText>,
    restored: Direction<RestoredFile>,
}

impl Session {
    pub fn new(compressor: Box<dyn Compressor>) -> Self {
        Self {
            compressor,
            chunk_size: DEFAULT_CHUNK_SIZE,
            packed: Direction::new("compress", false),
            restored: Direction::new("restore", true),
        }
    }

    /// Override the codec chunk size in raw bytes, clamped to
    /// [`MAX_CHUNK_SIZE`]. Output is unaffected.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.min(MAX_CHUNK_SIZE);
        self
    }

    pub fn compressor_name(&self) -> &'static str {
        self.compressor.name()
    }

    pub fn packed(&self) -> &Direction<PackedText> {
        &self.packed
    }

    pub fn packed_mut(&mut self) -> &mut Direction<PackedText> {
        &mut self.packed
    }

    pub fn restored(&self) -> &Direction<RestoredFile> {
        &self.restored
    }

    pub fn restored_mut(&mut self) -> &mut Direction<RestoredFile> {
        &mut self.restored
    }

    /// Compress `file` and encode it as a text payload.
    ///
    /// `None` is a no-op returning [`PackError::NoFileSelected`].
    pub fn compress(&mut self, file: Option<SelectedFile>) -> Result<&PackedText, PackError> {
        let Some(file) = file else {
            debug!("compress: no file selected");
            return Err(PackError::NoFileSelected);
        };
        self.packed.begin();
        match pack_file(self.compressor.as_ref(), &file, self.chunk_size) {
            Ok(packed) => Ok(self.packed.succeed(packed)),
            Err(e) => {
                self.packed.fail(&e);
                Err(e)
            }
        }
    }

    /// Decode a text payload from `file` and decompress it.
    ///
    /// `None` is a no-op returning [`PackError::NoFileSelected`].
    pub fn restore(&mut self, file: Option<SelectedFile>) -> Result<&RestoredFile, PackError> {
        let Some(file) = file else {
            debug!("restore: no file selected");
            return Err(PackError::NoFileSelected);
        };
        self.restored.begin();
        match restore_file(self.compressor.as_ref(), file, self.chunk_size) {
            Ok(restored) => Ok(self.restored.succeed(restored)),
            Err(e) => {
                self.restored.fail(&e);
                Err(e)
            }
        }
    }
}

// ── Stages ─────────────────────────────────────────────────────────────────

fn pack_file(
    compressor: &dyn Compressor,
    file: &SelectedFile,
    chunk_size: usize,
) -> Result<PackedText, PackError> {
    let t0 = Instant::now();
    let mut src = file.open()?;

    // Compressed bytes go straight into the text encoder.
    let mut writer = TextWriter::with_chunk_size(Vec::new(), chunk_size);
    let raw_len = compressor.compress_stream(&mut src, &mut writer)?;
    let encoded = writer.finish().map_err(PackError::CompressionFailure)?;
    let text = String::from_utf8(encoded).map_err(|e| {
        PackError::CompressionFailure(io::Error::new(io::ErrorKind::InvalidData, e))
    })?;

    let packed = PackedText {
        file_name: packed_name(file.name()),
        text,
        raw_len,
    };
    info!(
        "packed {} ({} bytes) with {} into {} payload characters in {:.3}s",
        file.name(),
        raw_len,
        compressor.name(),
        packed.text.len(),
        t0.elapsed().as_secs_f64()
    );
    Ok(packed)
}

fn restore_file(
    compressor: &dyn Compressor,
    file: SelectedFile,
    chunk_size: usize,
) -> Result<RestoredFile, PackError> {
    let t0 = Instant::now();
    let file_name = restored_name(file.name());
    let uploaded = file.name().to_string();

    let raw = file.into_bytes()?;
    let text = String::from_utf8(raw).map_err(|_| PayloadError::NotText)?;
    // Editors append a final newline; it is not part of the payload.
    let payload = text.trim_end_matches(&['\r', '\n'][..]);
    let compressed = text::decode_with_chunk_size(payload, (chunk_size / 3).saturating_mul(4))?;
    debug!("decoded {} payload characters into {} bytes", payload.len(), compressed.len());

    let mut bytes = Vec::new();
    let mut src = compressed.as_slice();
    compressor.decompress_stream(&mut src, &mut bytes)?;

    info!(
        "restored {} from {} ({} bytes) in {:.3}s",
        file_name,
        uploaded,
        bytes.len(),
        t0.elapsed().as_secs_f64()
    );
    Ok(RestoredFile { file_name, bytes })
}
