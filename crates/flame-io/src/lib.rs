//! # flame-io
//!
//! Image persistence for decoded frames.
//!
//! # Crate Structure
//!
//! ```text
//! flame-io
//! ├── png      - 8-bit RGB PNG encode/decode
//! ├── naming   - monotonic timestamped file names
//! └── sink     - PngSink, the no-clobber output directory
//! ```
//!
//! [`PngSink`] implements [`flame_core::ImageSink`], so it plugs straight
//! into [`flame_core::Orchestrator::run`].

#![warn(missing_docs)]

pub mod error;
pub mod naming;
pub mod png;
pub mod sink;

pub use error::{IoError, IoResult};
pub use naming::{file_name, FileStamp, DEFAULT_SUFFIX, EXTENSION};
pub use sink::PngSink;
