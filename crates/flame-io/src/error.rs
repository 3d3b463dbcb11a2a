//! Error types for image persistence.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Target file already exists; nothing was overwritten.
    #[error("output already exists: {}", .0.display())]
    Collision(PathBuf),

    /// Output directory missing or not a directory.
    #[error("invalid output directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported bit depth or color type.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Decoded data does not form a valid image.
    #[error(transparent)]
    Image(#[from] flame_core::Error),
}

impl IoError {
    /// Returns `true` for [`IoError::Collision`].
    #[inline]
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision(_))
    }
}

/// Result type for persistence operations.
pub type IoResult<T> = Result<T, IoError>;
