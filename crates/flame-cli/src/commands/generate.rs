//! Full pipeline: generate, decode, release, save.

use crate::GenerateArgs;
use anyhow::{Context, Result};
use flame_core::{Orchestrator, OrchestratorOptions, RunReport};
use flame_ffi::NativeGenerator;
use flame_io::PngSink;
use serde::Serialize;
use std::fs;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Runs one request against the native generator and saves the result.
pub fn run(args: GenerateArgs, verbose: u8) -> Result<()> {
    trace!(width = args.width, height = args.height, output = %args.output.display(), "generate::run");

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {}", args.output.display()))?;

    let options = OrchestratorOptions {
        slow_acquire: Duration::from_millis(args.slow_acquire_ms),
    };
    let mut orchestrator = Orchestrator::with_options(NativeGenerator, options);
    debug!(
        diagnostic = %orchestrator.handshake(),
        slow_acquire = ?orchestrator.options().slow_acquire,
        "native side ready"
    );

    let sink = PngSink::with_suffix(&args.output, &args.suffix);
    let report = orchestrator
        .run(args.width, args.height, &sink)
        .with_context(|| format!("Failed to generate {}x{} image", args.width, args.height))?;
    info!(path = %report.path.display(), "done");

    if args.json {
        let json = serde_json::to_string_pretty(&JsonReport::from(&report)).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_text(&report, verbose);
    }
    Ok(())
}

fn print_text(report: &RunReport, verbose: u8) {
    println!("{}", report.path.display());
    if verbose == 0 {
        return;
    }
    let t = &report.timings;
    println!("  size:        {}x{}", report.width, report.height);
    println!("  acquisition: {:.3} ms", ms(t.acquisition));
    println!("  transfer:    {:.3} ms", ms(t.transfer));
    println!("  decode:      {:.3} ms", ms(t.decode));
    println!("  persistence: {:.3} ms", ms(t.persistence));
    println!("  total:       {:.3} ms", ms(t.total()));
    if report.slow_acquisition {
        println!("  (acquisition exceeded the slow-acquire budget)");
    }
}

fn ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1e6
}

/// Machine-readable run report.
#[derive(Debug, Serialize)]
struct JsonReport {
    path: String,
    width: u32,
    height: u32,
    slow_acquisition: bool,
    timings_ms: JsonTimings,
}

#[derive(Debug, Serialize)]
struct JsonTimings {
    acquisition: f64,
    transfer: f64,
    decode: f64,
    persistence: f64,
    total: f64,
}

impl From<&RunReport> for JsonReport {
    fn from(report: &RunReport) -> Self {
        let t = &report.timings;
        Self {
            path: report.path.display().to_string(),
            width: report.width,
            height: report.height,
            slow_acquisition: report.slow_acquisition,
            timings_ms: JsonTimings {
                acquisition: ms(t.acquisition),
                transfer: ms(t.transfer),
                decode: ms(t.decode),
                persistence: ms(t.persistence),
                total: ms(t.total()),
            },
        }
    }
}
