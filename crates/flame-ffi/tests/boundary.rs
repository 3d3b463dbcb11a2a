//! Boundary tests: the C entry points driven through `NativeGenerator`.

use flame_core::{acquire, decode, Error, Generator, ImageDescriptor, Orchestrator, Rgb8, Stage};
use flame_ffi::{flame_release_image, flame_request_image, NativeGenerator};

#[test]
fn handshake_returns_text() {
    let orchestrator = Orchestrator::new(NativeGenerator);
    let text = orchestrator.handshake();
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn native_buffer_has_exact_length() {
    for (w, h) in [(1, 1), (2, 2), (640, 480), (3, 1000)] {
        let handle = acquire(&NativeGenerator, &ImageDescriptor::new(w, h)).expect("acquire");
        assert_eq!(handle.len(), w as usize * h as usize * 3);
        handle.release();
    }
}

#[test]
fn native_gradient_decodes_with_zero_blue() {
    let desc = ImageDescriptor::new(300, 260);
    let handle = acquire(&NativeGenerator, &desc).expect("acquire");
    let image = decode(&handle, &desc).expect("decode");
    handle.release();

    assert_eq!(image.pixel(0, 0), Rgb8::new(0, 0, 0));
    assert_eq!(image.pixel(254, 10), Rgb8::new(254, 10, 0));
    assert_eq!(image.pixel(255, 255), Rgb8::new(0, 0, 0));
    assert_eq!(image.pixel(299, 259), Rgb8::new(44, 4, 0));
    assert!(image.pixels().all(|p| p.b == 0));
}

#[test]
fn zero_dimension_never_reaches_native_side() {
    let mut orchestrator = Orchestrator::new(NativeGenerator);
    let err = orchestrator.generate_and_decode(0, 100).unwrap_err();
    assert!(err.is_dimension_error());
    assert_eq!(orchestrator.stage(), Stage::Failed);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_request_is_allocation_error() {
    // 2^31 * 2^31 * 3 fits in usize but exceeds isize::MAX, so the native
    // reservation fails deterministically.
    let side = 1u32 << 31;
    let mut orchestrator = Orchestrator::new(NativeGenerator);
    let err = orchestrator.generate_and_decode(side, side).unwrap_err();
    assert!(matches!(err, Error::Allocation { .. }), "got {err:?}");

    // The process is still fine and the next request succeeds.
    let image = orchestrator.generate_and_decode(8, 8).expect("recover");
    assert_eq!(image.pixel_count(), 64);
}

#[test]
fn raw_entry_points_pair_up() {
    let mut len = 0usize;
    let ptr = unsafe { flame_request_image(5120, 16, &mut len) };
    assert!(!ptr.is_null());
    assert_eq!(len, 5120 * 16 * 3);
    unsafe { flame_release_image(ptr, len) };
}

#[test]
fn generator_seam_is_object_safe() {
    let generator: &dyn Generator = &NativeGenerator;
    let handle = acquire(generator, &ImageDescriptor::new(4, 4)).expect("acquire");
    assert_eq!(handle.bytes()[3], 1);
}
