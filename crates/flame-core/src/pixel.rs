//! Decoded pixel type.
//!
//! [`Rgb8`] is the unit the decoder produces: three unsigned 8-bit channels,
//! no alpha, no color space conversion.
//!
//! # Memory Layout
//!
//! `#[repr(C)]` keeps the field order `r, g, b` so a slice of pixels has the
//! same layout as the interleaved bytes stored in
//! [`DecodedImage`](crate::DecodedImage).

use std::fmt;

/// Value the decoder writes into every blue channel.
///
/// The raw layout reserves a third byte per pixel, but the protocol maps it
/// to nothing: decoded blue is always zero, whatever the source byte holds.
pub const DECODED_BLUE: u8 = 0;

/// 8-bit RGB pixel.
///
/// # Example
///
/// ```
/// use flame_core::Rgb8;
///
/// let px = Rgb8::new(10, 20, 0);
/// assert_eq!(px.to_array(), [10, 20, 0]);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb8 {
    /// Creates a pixel from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Maps one raw 3-byte group to a pixel.
    ///
    /// byte0 is red, byte1 is green, byte2 is ignored and blue is
    /// [`DECODED_BLUE`].
    #[inline]
    pub const fn from_raw(raw: [u8; 3]) -> Self {
        Self::new(raw[0], raw[1], DECODED_BLUE)
    }

    /// Returns the channels as `[r, g, b]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    #[inline]
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    #[inline]
    fn from(px: Rgb8) -> Self {
        px.to_array()
    }
}

impl From<(u8, u8, u8)> for Rgb8 {
    #[inline]
    fn from(t: (u8, u8, u8)) -> Self {
        Self::new(t.0, t.1, t.2)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}
