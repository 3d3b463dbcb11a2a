//! Error types for the hand-off protocol.
//!
//! Every failure a request can hit is a variant of [`Error`]:
//!
//! - **Dimension errors**: [`InvalidDimension`](Error::InvalidDimension), raised
//!   before the generator is ever called
//! - **Allocation errors**: [`Allocation`](Error::Allocation), the generator
//!   returned a null region
//! - **Size errors**: [`BufferSize`](Error::BufferSize), the region length does
//!   not match the descriptor
//! - **Persistence errors**: [`Persistence`](Error::Persistence), the sink
//!   failed to store a decoded image
//!
//! None of these are process-fatal. A failed request leaves the orchestrator
//! ready for the next one.
//!
//! # Usage
//!
//! ```rust
//! use flame_core::{Error, ImageDescriptor};
//!
//! let err = ImageDescriptor::new(0, 100).byte_len().unwrap_err();
//! assert!(err.is_dimension_error());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive for `Display` and `std::error::Error`
//!
//! # Used By
//!
//! - [`crate::buffer`] - acquisition
//! - [`crate::decode`] - length precondition
//! - [`crate::orchestrator`] - per-request results

use thiserror::Error;

/// Boxed error produced by an [`ImageSink`](crate::ImageSink).
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while acquiring, decoding or persisting a generated image.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, the channel stride is not 3, or the byte
    /// length would overflow `usize`.
    ///
    /// Detected locally; no generator call is made.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// The generator returned a null region.
    ///
    /// Usually an allocation failure on the native side. Only the current
    /// request fails.
    #[error("generator failed to allocate {requested} bytes for {width}x{height}")]
    Allocation {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Bytes the request needed
        requested: usize,
    },

    /// Region length does not equal `width * height * channel_stride`.
    #[error("buffer holds {actual} bytes, descriptor {width}x{height}x{stride} needs {expected}")]
    BufferSize {
        /// Descriptor width
        width: u32,
        /// Descriptor height
        height: u32,
        /// Descriptor channel stride
        stride: u32,
        /// Bytes the descriptor requires
        expected: usize,
        /// Bytes the handle carries
        actual: usize,
    },

    /// The image sink could not store the decoded image.
    #[error("failed to persist image: {0}")]
    Persistence(#[source] SinkError),
}

impl Error {
    /// Creates an [`Error::InvalidDimension`] error.
    #[inline]
    pub fn invalid_dimension(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimension {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Allocation`] error.
    #[inline]
    pub fn allocation(width: u32, height: u32, requested: usize) -> Self {
        Self::Allocation {
            width,
            height,
            requested,
        }
    }

    /// Creates an [`Error::Persistence`] error from any sink error.
    #[inline]
    pub fn persistence(source: impl Into<SinkError>) -> Self {
        Self::Persistence(source.into())
    }

    /// Returns `true` for [`Error::InvalidDimension`].
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::InvalidDimension { .. })
    }

    /// Returns `true` for [`Error::Allocation`].
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }

    /// Returns `true` for [`Error::BufferSize`].
    #[inline]
    pub fn is_size_error(&self) -> bool {
        matches!(self, Self::BufferSize { .. })
    }

    /// Returns `true` for [`Error::Persistence`].
    #[inline]
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
