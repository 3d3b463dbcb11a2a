//! Pixel decoder.
//!
//! Converts a raw 3-byte-per-pixel buffer into [`Rgb8`] pixels with a fixed
//! channel mapping:
//!
//! | raw byte | decoded channel |
//! |----------|-----------------|
//! | byte0 | red |
//! | byte1 | green |
//! | byte2 | ignored, blue is [`DECODED_BLUE`](crate::DECODED_BLUE) |
//!
//! Decoding is a single forward pass over the buffer. [`pixels`] exposes it
//! as a lazy iterator; [`decode`] collects it into a [`DecodedImage`]. Both
//! reject a length mismatch before reading anything.

use crate::{BufferHandle, DecodedImage, Error, Generator, ImageDescriptor, Result, Rgb8};
use std::iter::FusedIterator;
use std::slice::ChunksExact;
use tracing::{debug, trace};

/// Lazy, bounds-checked iterator over the pixels of a raw buffer.
///
/// Yields exactly `width * height` pixels in row-major order and never reads
/// past the validated length. Once exhausted it stays exhausted; decode again
/// from the handle to start over.
#[derive(Debug, Clone)]
pub struct Pixels<'a> {
    chunks: ChunksExact<'a, u8>,
    consumed: usize,
}

impl Pixels<'_> {
    /// Returns how many bytes have been turned into pixels so far.
    #[inline]
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }
}

impl Iterator for Pixels<'_> {
    type Item = Rgb8;

    #[inline]
    fn next(&mut self) -> Option<Rgb8> {
        let chunk = self.chunks.next()?;
        self.consumed += 3;
        Some(Rgb8::from_raw([chunk[0], chunk[1], chunk[2]]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Pixels<'_> {}

impl FusedIterator for Pixels<'_> {}

/// Validates `bytes` against `descriptor` and returns a pixel iterator.
///
/// # Errors
///
/// - [`Error::InvalidDimension`] if the descriptor itself is invalid.
/// - [`Error::BufferSize`] if `bytes.len()` differs from the descriptor's byte length.
pub fn pixels_from_bytes<'a>(bytes: &'a [u8], descriptor: &ImageDescriptor) -> Result<Pixels<'a>> {
    let expected = descriptor.byte_len()?;
    if bytes.len() != expected {
        return Err(Error::BufferSize {
            width: descriptor.width,
            height: descriptor.height,
            stride: descriptor.channel_stride,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(Pixels {
        chunks: bytes.chunks_exact(descriptor.channel_stride as usize),
        consumed: 0,
    })
}

/// Returns a lazy pixel iterator over a buffer handle.
///
/// See [`pixels_from_bytes`] for errors.
pub fn pixels<'h, G: Generator + ?Sized>(
    handle: &'h BufferHandle<'_, G>,
    descriptor: &ImageDescriptor,
) -> Result<Pixels<'h>> {
    pixels_from_bytes(handle.bytes(), descriptor)
}

/// Decodes a raw byte buffer into a [`DecodedImage`].
///
/// See [`pixels_from_bytes`] for errors.
pub fn decode_bytes(bytes: &[u8], descriptor: &ImageDescriptor) -> Result<DecodedImage> {
    let iter = pixels_from_bytes(bytes, descriptor)?;
    Ok(collect(iter, descriptor))
}

/// Decodes the buffer behind `handle` into a [`DecodedImage`].
///
/// The handle stays owned by the caller, who releases it afterwards.
///
/// # Example
///
/// ```rust
/// use flame_core::{acquire, decode, ImageDescriptor, InProcessGenerator, Rgb8};
///
/// let raw = vec![10, 20, 9, 30, 40, 9, 50, 60, 9, 70, 80, 9];
/// let generator = InProcessGenerator::new(move |_, _| Some(raw.clone()));
/// let desc = ImageDescriptor::new(2, 2);
///
/// let handle = acquire(&generator, &desc).unwrap();
/// let image = decode(&handle, &desc).unwrap();
/// handle.release();
///
/// assert_eq!(image.pixel(1, 1), Rgb8::new(70, 80, 0));
/// ```
pub fn decode<G: Generator + ?Sized>(
    handle: &BufferHandle<'_, G>,
    descriptor: &ImageDescriptor,
) -> Result<DecodedImage> {
    trace!(width = descriptor.width, height = descriptor.height, len = handle.len(), "decode");
    let iter = pixels(handle, descriptor)?;
    Ok(collect(iter, descriptor))
}

pub(crate) fn collect(mut iter: Pixels<'_>, descriptor: &ImageDescriptor) -> DecodedImage {
    let total = iter.len() * 3;
    let mut data = Vec::with_capacity(total);
    for px in iter.by_ref() {
        data.extend_from_slice(&px.to_array());
    }
    debug_assert_eq!(iter.bytes_consumed(), total);
    debug!(pixels = total / 3, "decoded buffer");
    DecodedImage::from_parts(descriptor.width, descriptor.height, data)
}
