//! # flame-ffi
//!
//! The native side of the raster hand-off, exported with C linkage.
//!
//! # Boundary
//!
//! | Symbol | Purpose |
//! |--------|---------|
//! | [`flame_diagnostic_string`] | handshake, returns an owned C string |
//! | [`flame_free_string`] | frees a string from `flame_diagnostic_string` |
//! | [`flame_request_image`] | allocates and renders `width * height * 3` bytes |
//! | [`flame_release_image`] | frees a buffer from `flame_request_image` |
//!
//! Every allocation crossing the boundary has a matching free call. A
//! consumer that only reads and never frees leaks the full image on every
//! request.
//!
//! Rust consumers should use [`NativeGenerator`], which drives these symbols
//! through the [`flame_core::Generator`] seam so buffers end up in a
//! [`flame_core::BufferHandle`].
//!
//! See `include/flame_ffi.h` for the C declarations.

#![warn(missing_docs)]

pub mod gradient;
pub mod native;

pub use gradient::render_gradient;
pub use native::NativeGenerator;

use std::ffi::{c_char, CString};
use tracing::{debug, trace, warn};

/// Text returned by [`flame_diagnostic_string`].
pub fn diagnostic_text() -> String {
    format!("flame-ffi {}: native raster generator ready", env!("CARGO_PKG_VERSION"))
}

/// Returns a newly allocated, NUL-terminated UTF-8 diagnostic string.
///
/// Free it with [`flame_free_string`]. Returns null only if the text
/// contains an interior NUL, which never happens for the built-in text.
#[unsafe(no_mangle)]
pub extern "C" fn flame_diagnostic_string() -> *mut c_char {
    match CString::new(diagnostic_text()) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Frees a string returned by [`flame_diagnostic_string`].
///
/// Null is accepted and ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from [`flame_diagnostic_string`]
/// that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn flame_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: caller contract, pointer came from `CString::into_raw`.
    drop(unsafe { CString::from_raw(ptr) });
}

/// Renders a `width` x `height` image and returns its buffer.
///
/// The buffer holds exactly `width * height * 3` bytes, row-major,
/// byte0 = red, byte1 = green, byte2 = reserved. Its length is also written
/// to `out_len` when that pointer is non-null.
///
/// Returns null (and writes 0 to `out_len`) when either dimension is zero,
/// the size overflows, or allocation fails.
///
/// The buffer must be freed with [`flame_release_image`].
///
/// # Safety
///
/// `out_len` must be null or valid for a `usize` write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn flame_request_image(width: u32, height: u32, out_len: *mut usize) -> *mut u8 {
    debug!(width, height, "starting image generation");

    let (ptr, len) = match generate_boxed(width, height) {
        Some(boxed) => {
            let len = boxed.len();
            (Box::into_raw(boxed) as *mut u8, len)
        }
        None => (std::ptr::null_mut(), 0),
    };

    if !out_len.is_null() {
        // SAFETY: caller contract.
        unsafe { out_len.write(len) };
    }
    trace!(len, null = ptr.is_null(), "flame_request_image done");
    ptr
}

/// Frees a buffer returned by [`flame_request_image`].
///
/// Null is accepted and ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from [`flame_request_image`],
/// `len` must be the length reported for it, and it must not have been
/// released before.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn flame_release_image(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        if len != 0 {
            warn!(len, "flame_release_image called with null pointer");
        }
        return;
    }
    trace!(len, "flame_release_image");
    // SAFETY: caller contract, pointer and length came from `Box::into_raw`.
    drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
}

fn generate_boxed(width: u32, height: u32) -> Option<Box<[u8]>> {
    if width == 0 || height == 0 {
        return None;
    }
    render_gradient(width, height).map(Vec::into_boxed_slice)
}
