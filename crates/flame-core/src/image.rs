//! Decoded image buffer.
//!
//! [`DecodedImage`] is the structured result of decoding a raw buffer: an
//! owned, row-major grid of [`Rgb8`] pixels.
//!
//! # Memory Layout
//!
//! Pixels are stored interleaved, top-to-bottom:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! The flat layout is exactly what an 8-bit RGB encoder consumes, so sinks
//! can write [`as_bytes`](DecodedImage::as_bytes) without another copy.
//!
//! # Used By
//!
//! - [`crate::decode`] - builds images from buffer handles
//! - `flame-io` - encodes images to PNG

use crate::{Error, ImageDescriptor, Result, Rgb8, CHANNEL_STRIDE};

/// Owned 8-bit RGB image in row-major order.
///
/// # Example
///
/// ```rust
/// use flame_core::{DecodedImage, Rgb8};
///
/// let img = DecodedImage::from_data(2, 1, vec![1, 2, 0, 3, 4, 0]).unwrap();
/// assert_eq!(img.pixel(1, 0), Rgb8::new(3, 4, 0));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Interleaved RGB bytes
    data: Vec<u8>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl DecodedImage {
    /// Creates an image from interleaved RGB bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if a dimension is zero or the byte length
    ///   overflows `usize`.
    /// - [`Error::BufferSize`] if `data.len() != width * height * 3`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = ImageDescriptor::new(width, height).byte_len()?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                width,
                height,
                stride: CHANNEL_STRIDE,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Builds an image from an already-sized byte vector.
    ///
    /// Callers guarantee `data.len() == width * height * 3`.
    #[inline]
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(ImageDescriptor::new(width, height).byte_len().ok(), Some(data.len()));
        Self { data, width, height }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the interleaved RGB bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.pixel_offset(x, y);
        Rgb8::new(self.data[o], self.data[o + 1], self.data[o + 2])
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Returns one row of interleaved bytes.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row out of bounds");
        let row_bytes = ImageDescriptor::new(self.width, self.height).row_bytes();
        let start = y as usize * row_bytes;
        &self.data[start..start + row_bytes]
    }

    /// Iterates over all pixels in row-major order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Rgb8> + '_ {
        self.data
            .chunks_exact(3)
            .map(|c| Rgb8::new(c[0], c[1], c[2]))
    }

    /// Iterates over all pixels with their coordinates.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Rgb8)> + '_ {
        let width = self.width;
        self.pixels().enumerate().map(move |(i, px)| {
            let i = i as u64;
            ((i % width as u64) as u32, (i / width as u64) as u32, px)
        })
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}
