//! Error types for the Potree 2.0 decoder

use thiserror::Error;

/// Result type alias for decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Potree 2.0 decoder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Metadata declares a format version other than "2.0"
    #[error("unsupported Potree version: {0} (expected \"2.0\")")]
    UnsupportedVersion(String),

    /// Metadata's `encoding` does not match the reader variant's expected tag
    #[error("unsupported encoding: {found} (expected {expected})")]
    UnsupportedEncoding { found: String, expected: &'static str },

    /// `hierarchy.bin` is not a multiple of 22 bytes, or a field is out of range
    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(String),

    /// Brotli rejected a node's compressed payload
    #[error("failed to decompress node payload: {0}")]
    DecompressionFailure(String),

    /// Unknown attribute type tag, or a node's payload size doesn't match the schema
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Sum of node point counts does not equal `metadata.points`
    #[error("point count mismatch: decoded {decoded}, metadata declares {declared}")]
    PointCountMismatch { decoded: u64, declared: u64 },

    /// A file could not be opened or read
    #[error("I/O failure: {0}")]
    IoFailure(String),

    /// Unknown reader tag passed to the reader factory
    #[error("unknown reader: {0}")]
    UnknownReader(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoFailure(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SchemaMismatch(format!("invalid metadata.json: {err}"))
    }
}
