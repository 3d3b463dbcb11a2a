//! Protocol-level tests: acquisition, decoding and release across the
//! `Generator` seam.

use flame_core::{
    acquire, decode, Error, Generator, ImageDescriptor, Orchestrator, RawRegion, Rgb8, Stage,
};
use std::cell::{Cell, RefCell};

/// Generator serving a fixed byte pattern and recording every call.
struct Scripted {
    bytes: Option<Vec<u8>>,
    requests: RefCell<Vec<(u32, u32)>>,
    released: Cell<usize>,
}

impl Scripted {
    fn serving(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            requests: RefCell::new(Vec::new()),
            released: Cell::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            bytes: None,
            requests: RefCell::new(Vec::new()),
            released: Cell::new(0),
        }
    }
}

unsafe impl Generator for Scripted {
    fn diagnostic(&self) -> String {
        "scripted".to_string()
    }

    unsafe fn generate(&self, width: u32, height: u32) -> Option<RawRegion> {
        self.requests.borrow_mut().push((width, height));
        let boxed = self.bytes.clone()?.into_boxed_slice();
        let len = boxed.len();
        let ptr = Box::into_raw(boxed) as *mut u8;
        unsafe { RawRegion::from_raw_parts(ptr, len) }
    }

    unsafe fn release(&self, region: RawRegion) {
        self.released.set(self.released.get() + 1);
        let (ptr, len) = region.into_raw_parts();
        drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
    }
}

fn ramp(width: u32, height: u32) -> Vec<u8> {
    (0..width as usize * height as usize * 3)
        .map(|i| (i % 251) as u8)
        .collect()
}

#[test]
fn scenario_a_two_by_two() {
    let generator = Scripted::serving(vec![10, 20, 9, 30, 40, 9, 50, 60, 9, 70, 80, 9]);
    let desc = ImageDescriptor::new(2, 2);

    let handle = acquire(&generator, &desc).expect("acquire");
    let image = decode(&handle, &desc).expect("decode");
    handle.release();

    let pixels: Vec<(u8, u8, u8)> = image.pixels().map(|p| (p.r, p.g, p.b)).collect();
    assert_eq!(pixels, vec![(10, 20, 0), (30, 40, 0), (50, 60, 0), (70, 80, 0)]);
    assert_eq!(generator.released.get(), 1);
}

#[test]
fn scenario_b_zero_width_requests_nothing() {
    let generator = Scripted::serving(Vec::new());
    let mut orchestrator = Orchestrator::new(generator);

    let err = orchestrator.generate_and_decode(0, 100).unwrap_err();

    assert!(matches!(err, Error::InvalidDimension { width: 0, height: 100, .. }));
    assert!(orchestrator.generator().requests.borrow().is_empty());
    assert_eq!(orchestrator.generator().released.get(), 0);
}

#[test]
fn scenario_c_short_buffer() {
    let generator = Scripted::serving(vec![0; 11]);
    let desc = ImageDescriptor::new(2, 2);

    let handle = acquire(&generator, &desc).expect("acquire");
    assert_eq!(handle.len(), 11);
    let err = decode(&handle, &desc).unwrap_err();
    drop(handle);

    assert!(matches!(err, Error::BufferSize { expected: 12, actual: 11, .. }));
    assert_eq!(generator.released.get(), 1);
}

#[test]
fn scenario_c_orchestrator_still_releases() {
    let mut orchestrator = Orchestrator::new(Scripted::serving(vec![0; 11]));
    let err = orchestrator.generate_and_decode(2, 2).unwrap_err();
    assert!(err.is_size_error());
    assert_eq!(orchestrator.stage(), Stage::Failed);
    assert_eq!(orchestrator.generator().released.get(), 1);
}

#[test]
fn scenario_d_reference_scale() {
    let (w, h) = (5120, 5120);
    let mut orchestrator = Orchestrator::new(Scripted::serving(ramp(w, h)));

    let image = orchestrator.generate_and_decode(w, h).expect("decode 5120x5120");

    assert_eq!(image.as_bytes().len(), 78_643_200);
    assert_eq!(image.pixel_count(), 26_214_400);
    assert_eq!(image.pixel(w - 1, h - 1).b, 0);
    assert_eq!(orchestrator.generator().released.get(), 1);
}

#[test]
fn handle_length_matches_descriptor() {
    for (w, h) in [(1, 1), (3, 5), (17, 9), (64, 1)] {
        let generator = Scripted::serving(ramp(w, h));
        let desc = ImageDescriptor::new(w, h);
        let handle = acquire(&generator, &desc).expect("acquire");
        assert_eq!(handle.len(), (w * h * 3) as usize);
    }
}

#[test]
fn null_region_is_allocation_error() {
    let mut orchestrator = Orchestrator::new(Scripted::failing());
    let err = orchestrator.generate_and_decode(16, 16).unwrap_err();
    assert!(matches!(err, Error::Allocation { requested: 768, .. }));
    assert_eq!(orchestrator.generator().requests.borrow().as_slice(), &[(16, 16)]);
    assert_eq!(orchestrator.generator().released.get(), 0);
}

#[test]
fn decoded_pixels_follow_raw_bytes() {
    let (w, h) = (9, 4);
    let raw = ramp(w, h);
    let mut orchestrator = Orchestrator::new(Scripted::serving(raw.clone()));
    let image = orchestrator.generate_and_decode(w, h).expect("decode");

    for (x, y, px) in image.enumerate_pixels() {
        let o = ((y * w + x) * 3) as usize;
        assert_eq!(px, Rgb8::new(raw[o], raw[o + 1], 0));
    }
}

#[test]
fn orchestrator_is_reusable_after_failure() {
    let mut orchestrator = Orchestrator::new(Scripted::serving(ramp(4, 4)));
    assert!(orchestrator.generate_and_decode(0, 4).is_err());
    assert_eq!(orchestrator.stage(), Stage::Failed);
    assert!(orchestrator.generate_and_decode(4, 4).is_ok());
    assert_eq!(orchestrator.stage(), Stage::Done);
    assert_eq!(orchestrator.generator().released.get(), 1);
}

#[test]
fn each_region_goes_back_to_its_own_generator() {
    let left = Scripted::serving(ramp(2, 2));
    let right = Scripted::failing();
    let desc = ImageDescriptor::new(2, 2);

    let handle = acquire(&left, &desc).expect("acquire");
    assert!(acquire(&right, &desc).is_err());
    handle.release();

    assert_eq!(left.released.get(), 1);
    assert_eq!(right.released.get(), 0);
    assert_eq!(right.requests.borrow().len(), 1);
}
