//! Request orchestration.
//!
//! [`Orchestrator`] drives one request at a time through
//!
//! ```text
//! Idle -> Acquiring -> Decoding -> Releasing -> Done
//!              \            \            \
//!               `------------`------------`--> Failed
//! ```
//!
//! and records how long each stage took. Methods take `&mut self`, so a
//! single orchestrator can never run two generations at once; independent
//! requests get independent orchestrators.
//!
//! The buffer handle is released on every path out of
//! [`generate_and_decode`](Orchestrator::generate_and_decode), including decode
//! failures.
//!
//! # Usage
//!
//! ```rust
//! use flame_core::{InProcessGenerator, Orchestrator, Stage};
//!
//! let generator = InProcessGenerator::new(|w, h| Some(vec![0u8; (w * h * 3) as usize]));
//! let mut orchestrator = Orchestrator::new(generator);
//!
//! let image = orchestrator.generate_and_decode(64, 32).unwrap();
//! assert_eq!(image.dimensions(), (64, 32));
//! assert_eq!(orchestrator.stage(), Stage::Done);
//! ```

use crate::decode::collect;
use crate::{acquire, pixels, DecodedImage, Error, Generator, ImageDescriptor, Result, SinkError};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Default budget after which a slow acquisition is reported.
pub const DEFAULT_SLOW_ACQUIRE: Duration = Duration::from_secs(2);

/// Destination for decoded images.
///
/// The sink decides the file identity and encoding. It returns the path it
/// wrote to.
pub trait ImageSink {
    /// Persists `image`, returning where it was stored.
    fn persist(&self, image: &DecodedImage) -> std::result::Result<PathBuf, SinkError>;
}

impl<S: ImageSink + ?Sized> ImageSink for &S {
    fn persist(&self, image: &DecodedImage) -> std::result::Result<PathBuf, SinkError> {
        (**self).persist(image)
    }
}

/// Request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// No request has started.
    Idle,
    /// Waiting on the generator.
    Acquiring,
    /// Reading pixels out of the handle.
    Decoding,
    /// Handing the buffer back to the generator.
    Releasing,
    /// Last request produced an image.
    Done,
    /// Last request failed.
    Failed,
}

impl Stage {
    /// Returns `true` if no request is in flight.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle | Self::Done | Self::Failed)
    }

    /// Returns a short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Decoding => "decoding",
            Self::Releasing => "releasing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock time spent in each measurable stage of the last request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Generator call, including native allocation.
    pub acquisition: Duration,
    /// Validating the handle against the descriptor and mapping its bytes.
    pub transfer: Duration,
    /// Pixel decoding.
    pub decode: Duration,
    /// Sink write; zero when no sink was involved.
    pub persistence: Duration,
}

impl StageTimings {
    /// Sum of all stages.
    pub fn total(&self) -> Duration {
        self.acquisition + self.transfer + self.decode + self.persistence
    }
}

/// Tunables for an [`Orchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Acquisition time above which a warning is logged and
    /// [`RunReport::slow_acquisition`] is set.
    ///
    /// Native generation cannot be interrupted, so this reports rather than
    /// cancels.
    pub slow_acquire: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            slow_acquire: DEFAULT_SLOW_ACQUIRE,
        }
    }
}

/// Outcome of a full [`Orchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Where the sink stored the image.
    pub path: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Per-stage timings.
    pub timings: StageTimings,
    /// Acquisition exceeded [`OrchestratorOptions::slow_acquire`].
    pub slow_acquisition: bool,
}

/// Drives acquire, decode and release for one request at a time.
pub struct Orchestrator<G: Generator> {
    generator: G,
    options: OrchestratorOptions,
    stage: Stage,
    timings: StageTimings,
}

impl<G: Generator> Orchestrator<G> {
    /// Creates an orchestrator with default options.
    pub fn new(generator: G) -> Self {
        Self::with_options(generator, OrchestratorOptions::default())
    }

    /// Creates an orchestrator with explicit options.
    pub fn with_options(generator: G, options: OrchestratorOptions) -> Self {
        Self {
            generator,
            options,
            stage: Stage::Idle,
            timings: StageTimings::default(),
        }
    }

    /// Returns the wrapped generator.
    #[inline]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns timings of the most recent request.
    #[inline]
    pub fn timings(&self) -> StageTimings {
        self.timings
    }

    /// Returns the options in use.
    #[inline]
    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Asks the generator for its diagnostic string.
    pub fn handshake(&self) -> String {
        self.generator.diagnostic()
    }

    /// Generates a `width` x `height` image and decodes it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] for zero or overflowing dimensions; the
    ///   generator is not called.
    /// - [`Error::Allocation`] if the generator returns no buffer.
    /// - [`Error::BufferSize`] if the buffer length does not match.
    ///
    /// On error the stage is [`Stage::Failed`] and any acquired buffer has
    /// been released.
    pub fn generate_and_decode(&mut self, width: u32, height: u32) -> Result<DecodedImage> {
        debug_assert!(self.stage.is_terminal(), "request already in flight");
        self.timings = StageTimings::default();
        let result = self.run_stages(width, height);
        match &result {
            Ok(_) => enter(&mut self.stage, Stage::Done),
            Err(e) => {
                debug!(error = %e, "request failed");
                enter(&mut self.stage, Stage::Failed);
            }
        }
        result
    }

    fn run_stages(&mut self, width: u32, height: u32) -> Result<DecodedImage> {
        let descriptor = ImageDescriptor::new(width, height);
        descriptor.byte_len()?;

        enter(&mut self.stage, Stage::Acquiring);
        let started = Instant::now();
        let handle = acquire(&self.generator, &descriptor)?;
        self.timings.acquisition = started.elapsed();
        if self.timings.acquisition > self.options.slow_acquire {
            warn!(
                elapsed = ?self.timings.acquisition,
                budget = ?self.options.slow_acquire,
                width,
                height,
                "slow buffer acquisition"
            );
        }

        enter(&mut self.stage, Stage::Decoding);
        let started = Instant::now();
        let decoded = pixels(&handle, &descriptor).map(|iter| {
            self.timings.transfer = started.elapsed();
            let started = Instant::now();
            let image = collect(iter, &descriptor);
            self.timings.decode = started.elapsed();
            image
        });

        enter(&mut self.stage, Stage::Releasing);
        handle.release();

        let image = decoded?;
        debug!(
            width,
            height,
            acquisition = ?self.timings.acquisition,
            decode = ?self.timings.decode,
            "generated and decoded"
        );
        Ok(image)
    }

    /// Generates, decodes and persists one image.
    ///
    /// # Errors
    ///
    /// Any error from [`generate_and_decode`](Self::generate_and_decode), or
    /// [`Error::Persistence`] if the sink fails.
    pub fn run<S: ImageSink + ?Sized>(&mut self, width: u32, height: u32, sink: &S) -> Result<RunReport> {
        let image = self.generate_and_decode(width, height)?;

        let started = Instant::now();
        let persisted = sink.persist(&image);
        self.timings.persistence = started.elapsed();

        let path = match persisted {
            Ok(path) => path,
            Err(e) => {
                enter(&mut self.stage, Stage::Failed);
                return Err(Error::Persistence(e));
            }
        };
        info!(path = %path.display(), width, height, total = ?self.timings.total(), "image persisted");

        Ok(RunReport {
            path,
            width,
            height,
            timings: self.timings,
            slow_acquisition: self.timings.acquisition > self.options.slow_acquire,
        })
    }
}

fn enter(stage: &mut Stage, next: Stage) {
    trace!(from = %stage, to = %next, "stage transition");
    *stage = next;
}

impl<G: Generator + fmt::Debug> fmt::Debug for Orchestrator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("generator", &self.generator)
            .field("stage", &self.stage)
            .field("options", &self.options)
            .finish()
    }
}
