//! # flame-core
//!
//! Buffer ownership and pixel decoding for raster images handed across an
//! allocation boundary.
//!
//! A native generator allocates a raw RGB buffer; this crate takes it over,
//! checks it, decodes it and gives it back exactly once:
//!
//! - [`ImageDescriptor`] - declared width, height and channel stride
//! - [`Generator`] - seam to whatever allocates the raw buffer
//! - [`BufferHandle`] - owning, read-only wrapper with a consuming release
//! - [`decode`] / [`Pixels`] - fixed channel mapping into [`Rgb8`] pixels
//! - [`DecodedImage`] - owned, row-major result
//! - [`Orchestrator`] - validate, acquire, decode, release, persist
//!
//! ## Crate Structure
//!
//! ```text
//! flame-core (this crate)
//!    ^
//!    |
//!    +-- flame-ffi (native generator behind a C ABI)
//!    +-- flame-io  (PNG sink)
//!    +-- flame-cli (the `flame` binary)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use flame_core::{InProcessGenerator, Orchestrator, Rgb8};
//!
//! let generator = InProcessGenerator::new(|w, h| {
//!     Some((0..w * h).flat_map(|i| [i as u8, 1, 99]).collect())
//! });
//! let mut orchestrator = Orchestrator::new(generator);
//! let image = orchestrator.generate_and_decode(2, 2).unwrap();
//! assert_eq!(image.pixel(1, 0), Rgb8::new(1, 1, 0));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod decode;
pub mod descriptor;
pub mod error;
pub mod image;
pub mod orchestrator;
pub mod pixel;

pub use buffer::{acquire, BufferHandle, Generator, InProcessGenerator, RawRegion};
pub use decode::{decode, decode_bytes, pixels, pixels_from_bytes, Pixels};
pub use descriptor::{ImageDescriptor, CHANNEL_STRIDE};
pub use error::{Error, Result, SinkError};
pub use image::DecodedImage;
pub use orchestrator::{
    ImageSink, Orchestrator, OrchestratorOptions, RunReport, Stage, StageTimings, DEFAULT_SLOW_ACQUIRE,
};
pub use pixel::{Rgb8, DECODED_BLUE};

/// Prelude module for convenient imports.
///
/// ```
/// use flame_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{acquire, BufferHandle, Generator};
    pub use crate::decode::decode;
    pub use crate::descriptor::ImageDescriptor;
    pub use crate::error::{Error, Result};
    pub use crate::image::DecodedImage;
    pub use crate::orchestrator::{ImageSink, Orchestrator, Stage};
    pub use crate::pixel::Rgb8;
}
