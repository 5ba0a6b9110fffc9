//! Turning raw inputs into text.

use crate::error::ReadError;
use async_trait::async_trait;
use std::path::PathBuf;

/// UTF-8 byte order mark, dropped from the start of decoded content
const BOM: char = '\u{feff}';

/// Where the bytes of a [`RawInput`] come from
#[derive(Clone, Debug)]
pub enum InputSource {
    /// A file on the local filesystem, read lazily
    Path(PathBuf),
    /// Content already held in memory (e.g. a multipart upload)
    Bytes(Vec<u8>),
}

/// One caller-supplied file before any parsing
///
/// The name is used for diagnostics only; content shape is what gets
/// validated, never the filename or extension.
#[derive(Clone, Debug)]
pub struct RawInput {
    /// Display name for logs and failure reports
    pub name: String,
    /// Content accessor
    pub source: InputSource,
}

impl RawInput {
    /// Create an input backed by a file on disk, named after its file name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: InputSource::Path(path),
        }
    }

    /// Create an input from content already in memory
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: InputSource::Bytes(bytes.into()),
        }
    }
}

/// Source of text content for the combiner
///
/// Implementations must keep failures local to the input they were given:
/// one unreadable input never affects another.
///
/// # Examples
///
/// ```
/// use guest_toolhub::combiner::{ContentReader, FsContentReader, RawInput};
///
/// # #[tokio::main]
/// # async fn main() {
/// let reader = FsContentReader::new(None);
/// let text = reader
///     .read(RawInput::from_bytes("a.dat", b"{}".to_vec()))
///     .await
///     .unwrap();
/// assert_eq!(text, "{}");
/// # }
/// ```
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Read the full content of `input` as UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns a [`ReadError`] if the medium is unreadable, the content is
    /// not UTF-8, or it exceeds a size limit imposed by the implementation.
    async fn read(&self, input: RawInput) -> Result<String, ReadError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Default reader: tokio filesystem reads and in-memory buffers
#[derive(Clone, Copy, Debug, Default)]
pub struct FsContentReader {
    max_file_size: Option<u64>,
}

impl FsContentReader {
    /// Create a reader with an optional per-input size limit in bytes
    pub fn new(max_file_size: Option<u64>) -> Self {
        Self { max_file_size }
    }

    fn check_size(&self, name: &str, size: u64) -> Result<(), ReadError> {
        match self.max_file_size {
            Some(limit) if size > limit => Err(ReadError::TooLarge {
                name: name.to_string(),
                size,
                limit,
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ContentReader for FsContentReader {
    async fn read(&self, input: RawInput) -> Result<String, ReadError> {
        let RawInput { name, source } = input;

        let bytes = match source {
            InputSource::Path(path) => {
                if self.max_file_size.is_some() {
                    let metadata =
                        tokio::fs::metadata(&path)
                            .await
                            .map_err(|source| ReadError::Io {
                                name: name.clone(),
                                source,
                            })?;
                    self.check_size(&name, metadata.len())?;
                }
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| ReadError::Io {
                        name: name.clone(),
                        source,
                    })?
            }
            InputSource::Bytes(bytes) => {
                self.check_size(&name, bytes.len() as u64)?;
                bytes
            }
        };

        decode_text(&name, bytes)
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}

/// Decode bytes as UTF-8, dropping a leading byte order mark
pub(crate) fn decode_text(name: &str, bytes: Vec<u8>) -> Result<String, ReadError> {
    let text = String::from_utf8(bytes).map_err(|source| ReadError::Encoding {
        name: name.to_string(),
        source,
    })?;

    match text.strip_prefix(BOM) {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}
