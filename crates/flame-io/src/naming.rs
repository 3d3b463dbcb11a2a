//! Output file naming.
//!
//! Files are named `<stamp>_<suffix>.png`, where `<stamp>` is nanoseconds
//! since the Unix epoch zero-padded to 20 digits so names sort
//! chronologically. Stamps are strictly increasing within a process, so two
//! images saved in the same clock tick still get distinct names.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default file-name suffix.
pub const DEFAULT_SUFFIX: &str = "rgout";

/// File extension for persisted images.
pub const EXTENSION: &str = "png";

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// A per-process unique, monotonic timestamp in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileStamp(u64);

impl FileStamp {
    /// Takes a fresh stamp: `max(now, previous + 1)`.
    pub fn now() -> Self {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        let mut prev = LAST_STAMP.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev.saturating_add(1));
            match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Self(next),
                Err(actual) => prev = actual,
            }
        }
    }

    /// Wraps a raw nanosecond value.
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Raw nanoseconds since the Unix epoch.
    #[inline]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

/// Builds `<stamp>_<suffix>.png`.
pub fn file_name(stamp: FileStamp, suffix: &str) -> String {
    format!("{:020}_{}.{}", stamp.0, suffix, EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_format() {
        let name = file_name(FileStamp::from_nanos(1_700_000_000_123_456_789), "rgout");
        assert_eq!(name, "01700000000123456789_rgout.png");
    }

    #[test]
    fn test_padding_keeps_lexical_order() {
        let a = file_name(FileStamp::from_nanos(9), DEFAULT_SUFFIX);
        let b = file_name(FileStamp::from_nanos(10), DEFAULT_SUFFIX);
        assert!(a < b);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let stamps: Vec<_> = (0..1000).map(|_| FileStamp::now()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stamps_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| FileStamp::now()).collect::<Vec<_>>()))
            .collect();
        let mut all: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let n = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), n);
    }
}
