//! PNG encoding and decoding for [`DecodedImage`].
//!
//! Only 8-bit RGB is produced. Reading accepts 8-bit RGB and RGBA (alpha is
//! dropped), which covers everything this crate writes plus common viewers'
//! re-saves.
//!
//! # Example
//!
//! ```rust,ignore
//! use flame_io::png::{read, write};
//!
//! write("frame.png", &image)?;
//! let back = read("frame.png")?;
//! ```

use crate::{IoError, IoResult};
use flame_core::DecodedImage;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::trace;

/// Reads a PNG file into a [`DecodedImage`].
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<DecodedImage> {
    trace!(path = %path.as_ref().display(), "png::read");
    let file = File::open(path.as_ref())?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let data = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => buf,
        (png::ColorType::Rgba, png::BitDepth::Eight) => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedBitDepth(format!("{color_type:?} {bit_depth:?}")));
        }
    };

    Ok(DecodedImage::from_data(info.width, info.height, data)?)
}

/// Encodes `image` as an 8-bit RGB PNG into `writer`.
///
/// Pass `&mut writer` to keep the writer for flushing or syncing afterwards.
pub fn encode<W: Write>(writer: W, image: &DecodedImage) -> IoResult<()> {
    let (width, height) = image.dimensions();
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(image.as_bytes())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))
}

/// Writes `image` to `path`, replacing any existing file.
///
/// Use [`PngSink`](crate::PngSink) for no-clobber, atomic output.
pub fn write<P: AsRef<Path>>(path: P, image: &DecodedImage) -> IoResult<()> {
    trace!(path = %path.as_ref().display(), "png::write");
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}
