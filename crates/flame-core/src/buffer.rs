//! Buffer ownership protocol.
//!
//! A [`Generator`] hands out raw memory regions it allocated; a
//! [`BufferHandle`] wraps one region for the consuming side and gives it back
//! exactly once.
//!
//! # Ownership
//!
//! ```text
//!   Generator::generate ──> RawRegion ──> BufferHandle (native-owned)
//!                                              │
//!                   release(self) or Drop ─────┘──> Generator::release (released)
//! ```
//!
//! The handle's ownership tag is the presence of its region. `release`
//! consumes the handle and `Drop` releases whatever is still owned, so
//! double-release and use-after-release cannot be written, and early returns
//! never leak the native allocation.
//!
//! # Example
//!
//! ```rust
//! use flame_core::{acquire, ImageDescriptor, InProcessGenerator};
//!
//! let generator = InProcessGenerator::new(|w, h| Some(vec![7u8; (w * h * 3) as usize]));
//! let desc = ImageDescriptor::new(4, 4);
//! let handle = acquire(&generator, &desc).unwrap();
//! assert_eq!(handle.len(), 48);
//! handle.release();
//! ```

use crate::{Error, ImageDescriptor, Result};
use std::fmt;
use std::ptr::NonNull;
use tracing::{debug, trace, warn};

/// A generator-owned memory region: start pointer and length.
///
/// Regions are neither `Copy` nor `Clone`: handing one to
/// [`Generator::release`] moves it, so the same region cannot be released
/// twice. Dropping a region without releasing it leaks the allocation and
/// logs a warning.
pub struct RawRegion {
    ptr: NonNull<u8>,
    len: usize,
}

impl RawRegion {
    /// Wraps a pointer and length returned by a generator.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` initialized bytes that stay valid and
    /// unmodified until the region is passed back to the [`Generator::release`]
    /// of the generator that produced it.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, len })
    }

    /// Returns the region length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the region holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the start pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Consumes the region, returning its pointer and length.
    ///
    /// Intended for [`Generator::release`] implementations.
    #[inline]
    pub fn into_raw_parts(self) -> (*mut u8, usize) {
        let parts = (self.ptr.as_ptr(), self.len);
        std::mem::forget(self);
        parts
    }

    #[inline]
    fn as_slice(&self) -> &[u8] {
        // SAFETY: guaranteed by the `from_raw_parts` contract; the region has
        // not been released because releasing consumes it.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for RawRegion {
    fn drop(&mut self) {
        warn!(len = self.len, "raw region dropped without release, native allocation leaked");
    }
}

impl fmt::Debug for RawRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRegion")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

/// Producer of raw pixel buffers.
///
/// Consumers go through [`acquire`] and [`BufferHandle`], which pair every
/// region with the generator that produced it. Calling `generate` or
/// `release` directly requires `unsafe`:
///
/// ```rust,compile_fail
/// use flame_core::{Generator, InProcessGenerator};
///
/// let a = InProcessGenerator::new(|w, h| Some(vec![0u8; (w * h * 3) as usize]));
/// let b = InProcessGenerator::new(|_, _| None);
/// let region = a.generate(2, 2).unwrap();
/// b.release(region);
/// ```
///
/// # Safety
///
/// Every region returned by [`generate`](Generator::generate) must satisfy the
/// [`RawRegion::from_raw_parts`] contract, and [`release`](Generator::release)
/// must free exactly the allocation behind a region this generator produced.
pub unsafe trait Generator {
    /// Handshake / liveness probe.
    fn diagnostic(&self) -> String;

    /// Produces a `width * height * 3` byte region, or `None` on failure.
    ///
    /// # Safety
    ///
    /// The caller must hand a returned region back to `release` on this same
    /// generator exactly once.
    unsafe fn generate(&self, width: u32, height: u32) -> Option<RawRegion>;

    /// Frees a region previously returned by [`generate`](Generator::generate).
    ///
    /// # Safety
    ///
    /// `region` must have been returned by `generate` on this same generator.
    unsafe fn release(&self, region: RawRegion);
}

/// Read-only, owning handle to a generator's region.
///
/// Created by [`acquire`]. The handle carries the length the generator
/// reported rather than one derived from the descriptor, so
/// [`decode`](crate::decode) can detect a mismatch.
pub struct BufferHandle<'g, G: Generator + ?Sized> {
    /// `Some` while native-owned, `None` once released.
    region: Option<RawRegion>,
    generator: &'g G,
}

impl<'g, G: Generator + ?Sized> BufferHandle<'g, G> {
    fn new(region: RawRegion, generator: &'g G) -> Self {
        Self {
            region: Some(region),
            generator,
        }
    }

    /// Returns the region length in bytes as reported by the generator.
    #[inline]
    pub fn len(&self) -> usize {
        self.region.as_ref().map_or(0, RawRegion::len)
    }

    /// Returns `true` if the handle holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.as_ref().is_none_or(RawRegion::is_empty)
    }

    /// Returns the buffer bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        match &self.region {
            Some(region) => region.as_slice(),
            None => &[],
        }
    }

    /// Gives the region back to the generator.
    ///
    /// Call once the bytes have been fully decoded. Dropping the handle has
    /// the same effect.
    pub fn release(mut self) {
        self.release_region();
    }

    fn release_region(&mut self) {
        if let Some(region) = self.region.take() {
            trace!(len = region.len(), "releasing native buffer");
            // SAFETY: the region came from `self.generator` in `acquire`, and
            // `take` guarantees it is handed back once.
            unsafe { self.generator.release(region) };
        }
    }
}

impl<G: Generator + ?Sized> Drop for BufferHandle<'_, G> {
    fn drop(&mut self) {
        if self.region.is_some() {
            debug!("buffer handle dropped without explicit release");
        }
        self.release_region();
    }
}

impl<G: Generator + ?Sized> fmt::Debug for BufferHandle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHandle")
            .field("region", &self.region)
            .finish()
    }
}

/// Requests a buffer for `descriptor` and wraps it in a [`BufferHandle`].
///
/// # Errors
///
/// - [`Error::InvalidDimension`] if the descriptor fails validation; the
///   generator is not called.
/// - [`Error::Allocation`] if the generator returns no region.
pub fn acquire<'g, G: Generator + ?Sized>(
    generator: &'g G,
    descriptor: &ImageDescriptor,
) -> Result<BufferHandle<'g, G>> {
    trace!(width = descriptor.width, height = descriptor.height, "acquire");
    let requested = descriptor.byte_len()?;

    // SAFETY: the region goes straight into a handle bound to `generator`,
    // which releases it exactly once.
    let region = unsafe { generator.generate(descriptor.width, descriptor.height) }
        .ok_or_else(|| Error::allocation(descriptor.width, descriptor.height, requested))?;

    if region.len() != requested {
        warn!(
            expected = requested,
            actual = region.len(),
            "generator returned a region of unexpected length"
        );
    }
    debug!(len = region.len(), "acquired native buffer");
    Ok(BufferHandle::new(region, generator))
}

// ============================================================================
// In-process generator
// ============================================================================

/// [`Generator`] backed by a Rust closure.
///
/// The closure's `Vec` is leaked into a region on `generate` and rebuilt and
/// dropped on `release`. Useful for tests, benchmarks and renderers living in
/// the same process as the consumer.
pub struct InProcessGenerator<F> {
    render: F,
    label: String,
}

impl<F> InProcessGenerator<F>
where
    F: Fn(u32, u32) -> Option<Vec<u8>>,
{
    /// Wraps a render closure.
    pub fn new(render: F) -> Self {
        Self {
            render,
            label: "in-process generator".to_string(),
        }
    }

    /// Sets the string returned by [`Generator::diagnostic`].
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

// SAFETY: regions come from `Box<[u8]>::into_raw` and are rebuilt with the same
// pointer and length in `release`.
unsafe impl<F> Generator for InProcessGenerator<F>
where
    F: Fn(u32, u32) -> Option<Vec<u8>>,
{
    fn diagnostic(&self) -> String {
        self.label.clone()
    }

    unsafe fn generate(&self, width: u32, height: u32) -> Option<RawRegion> {
        let boxed = (self.render)(width, height)?.into_boxed_slice();
        let len = boxed.len();
        let ptr = Box::into_raw(boxed) as *mut u8;
        // SAFETY: the box is live until `release` rebuilds it.
        unsafe { RawRegion::from_raw_parts(ptr, len) }
    }

    unsafe fn release(&self, region: RawRegion) {
        let (ptr, len) = region.into_raw_parts();
        // SAFETY: `ptr`/`len` came from `Box::into_raw` in `generate`.
        drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
    }
}

impl<F> fmt::Debug for InProcessGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessGenerator")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
