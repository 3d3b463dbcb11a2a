//! Timestamped PNG output directory.

use crate::naming::{file_name, FileStamp, DEFAULT_SUFFIX};
use crate::{png, IoError, IoResult};
use flame_core::{DecodedImage, ImageSink, SinkError};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{debug, info, trace};

/// Persists decoded images as `<stamp>_<suffix>.png` in one directory.
///
/// Each image is encoded into a hidden temporary file in the target
/// directory, synced, then linked into place without replacing anything.
/// A failed write never leaves a partial `.png` behind, and an existing file
/// with the same name is reported as [`IoError::Collision`].
///
/// # Example
///
/// ```rust,ignore
/// use flame_io::PngSink;
///
/// let sink = PngSink::new("out");
/// let path = sink.save(&image)?;
/// ```
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
    suffix: String,
}

impl PngSink {
    /// Sink writing into `dir` with the default `rgout` suffix.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_suffix(dir, DEFAULT_SUFFIX)
    }

    /// Sink writing into `dir` with a custom file-name suffix.
    pub fn with_suffix(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File-name suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Saves `image` under a fresh timestamp.
    pub fn save(&self, image: &DecodedImage) -> IoResult<PathBuf> {
        self.save_as(image, FileStamp::now())
    }

    /// Saves `image` under the given timestamp.
    pub fn save_as(&self, image: &DecodedImage, stamp: FileStamp) -> IoResult<PathBuf> {
        let target = self.dir.join(file_name(stamp, &self.suffix));
        trace!(target = %target.display(), "PngSink::save_as");

        if !self.dir.is_dir() {
            return Err(IoError::InvalidDirectory(self.dir.clone()));
        }

        let mut tmp = Builder::new()
            .prefix(".flame-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            png::encode(&mut writer, image)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        debug!(tmp = %tmp.path().display(), bytes = image.as_bytes().len(), "encoded");

        match tmp.persist_noclobber(&target) {
            Ok(_) => {
                info!(path = %target.display(), width = image.width(), height = image.height(), "image saved");
                Ok(target)
            }
            // The temp file is removed when the error drops.
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Err(IoError::Collision(target)),
            Err(e) => Err(IoError::Io(e.error)),
        }
    }
}

impl ImageSink for PngSink {
    fn persist(&self, image: &DecodedImage) -> Result<PathBuf, SinkError> {
        self.save(image).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DecodedImage {
        DecodedImage::from_data(2, 2, vec![1, 2, 0, 3, 4, 0, 5, 6, 0, 7, 8, 0]).unwrap()
    }

    fn png_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "png"))
            .collect()
    }

    #[test]
    fn test_save_names_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::new(dir.path());
        let path = sink.save_as(&small(), FileStamp::from_nanos(42)).unwrap();

        assert_eq!(path.file_name().unwrap(), "00000000000000000042_rgout.png");
        assert_eq!(crate::png::read(&path).unwrap().as_bytes(), small().as_bytes());
    }

    #[test]
    fn test_collision_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::with_suffix(dir.path(), "x");
        let stamp = FileStamp::from_nanos(7);
        let first = sink.save_as(&small(), stamp).unwrap();
        let before = std::fs::read(&first).unwrap();

        let other = DecodedImage::from_data(1, 1, vec![9, 9, 0]).unwrap();
        let err = sink.save_as(&other, stamp).unwrap_err();
        assert!(err.is_collision());
        assert_eq!(std::fs::read(&first).unwrap(), before);

        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::new(dir.path().join("absent"));
        let err = sink.save(&small()).unwrap_err();
        assert!(matches!(err, IoError::InvalidDirectory(_)));
    }

    #[test]
    fn test_consecutive_saves_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::new(dir.path());
        let a = sink.save(&small()).unwrap();
        let b = sink.save(&small()).unwrap();
        assert_ne!(a, b);
        assert_eq!(png_files(dir.path()).len(), 2);
    }

    #[test]
    fn test_image_sink_impl() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PngSink::new(dir.path());
        let path = ImageSink::persist(&sink, &small()).unwrap();
        assert!(path.starts_with(dir.path()));
    }
}
