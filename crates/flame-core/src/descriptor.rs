//! Image descriptor: the caller-declared shape of a raw buffer.
//!
//! [`ImageDescriptor`] is the "header" the consumer uses to validate a region
//! before touching it. The native side only ever sees width and height; the
//! channel stride is fixed by the protocol.
//!
//! ```text
//! byte offset:  0   1   2   3   4   5   ...
//!               R0  G0  x0  R1  G1  x1  ...
//!               └ pixel 0 ┘ └ pixel 1 ┘
//! ```
//!
//! # Used By
//!
//! - [`crate::buffer::acquire`] - rejects bad dimensions before the boundary
//! - [`crate::decode`] - checks the region length against [`ImageDescriptor::byte_len`]

use crate::{Error, Result};

/// Bytes per pixel in the raw layout.
pub const CHANNEL_STRIDE: u32 = 3;

/// Width, height and channel stride of a raw pixel buffer.
///
/// Descriptors are plain data and can be built in any state. Validation
/// happens in [`byte_len`](Self::byte_len), which every protocol operation
/// calls first.
///
/// # Example
///
/// ```rust
/// use flame_core::ImageDescriptor;
///
/// let desc = ImageDescriptor::new(5120, 5120);
/// assert_eq!(desc.byte_len().unwrap(), 78_643_200);
/// assert_eq!(desc.pixel_count(), 26_214_400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDescriptor {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bytes per pixel, always [`CHANNEL_STRIDE`] for this protocol
    pub channel_stride: u32,
}

impl ImageDescriptor {
    /// Creates a descriptor with the protocol's fixed channel stride.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channel_stride: CHANNEL_STRIDE,
        }
    }

    /// Returns the total number of pixels, computed in 64 bits.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Validates the descriptor and returns the exact byte length a matching
    /// buffer must have.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is zero, the
    /// stride is not [`CHANNEL_STRIDE`], or `width * height * stride`
    /// overflows `usize`.
    pub fn byte_len(&self) -> Result<usize> {
        if self.width == 0 {
            return Err(Error::invalid_dimension(self.width, self.height, "width must be non-zero"));
        }
        if self.height == 0 {
            return Err(Error::invalid_dimension(self.width, self.height, "height must be non-zero"));
        }
        if self.channel_stride != CHANNEL_STRIDE {
            return Err(Error::invalid_dimension(
                self.width,
                self.height,
                format!("channel stride must be {}, got {}", CHANNEL_STRIDE, self.channel_stride),
            ));
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.channel_stride as usize))
            .ok_or_else(|| Error::invalid_dimension(self.width, self.height, "byte length overflows usize"))
    }

    /// Returns the number of bytes in one row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.channel_stride as usize
    }
}
