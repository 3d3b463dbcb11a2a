//! [`Generator`] adapter over the exported C ABI.
//!
//! Goes through the same `extern "C"` entry points a foreign consumer would
//! call, so Rust callers exercise the real boundary contract.

use crate::{flame_diagnostic_string, flame_free_string, flame_release_image, flame_request_image};
use flame_core::{Generator, RawRegion};
use std::ffi::CStr;
use tracing::trace;

/// The native generator, driven through its C entry points.
///
/// # Example
///
/// ```rust
/// use flame_core::Orchestrator;
/// use flame_ffi::NativeGenerator;
///
/// let mut orchestrator = Orchestrator::new(NativeGenerator);
/// let image = orchestrator.generate_and_decode(16, 8).unwrap();
/// assert_eq!(image.pixel(5, 3).to_array(), [5, 3, 0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeGenerator;

// SAFETY: regions come straight from `flame_request_image` with the length it
// reports, and go back to `flame_release_image` unchanged.
unsafe impl Generator for NativeGenerator {
    fn diagnostic(&self) -> String {
        let ptr = flame_diagnostic_string();
        if ptr.is_null() {
            return String::new();
        }
        // SAFETY: non-null pointer from `flame_diagnostic_string`, freed below.
        let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { flame_free_string(ptr) };
        text
    }

    unsafe fn generate(&self, width: u32, height: u32) -> Option<RawRegion> {
        let mut len = 0usize;
        // SAFETY: `len` is a valid out pointer.
        let ptr = unsafe { flame_request_image(width, height, &mut len) };
        trace!(width, height, len, "native generate");
        // SAFETY: a non-null pointer owns `len` bytes until `flame_release_image`.
        unsafe { RawRegion::from_raw_parts(ptr, len) }
    }

    unsafe fn release(&self, region: RawRegion) {
        let (ptr, len) = region.into_raw_parts();
        // SAFETY: region came from `generate` and is consumed here.
        unsafe { flame_release_image(ptr, len) };
    }
}
