//! flame - native raster hand-off driver
//!
//! Requests an image from the native generator, decodes it and writes a PNG.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "flame")]
#[command(author, version, about = "Native raster hand-off driver")]
#[command(long_about = "
Requests a raster from the native generator, decodes it into RGB pixels
(red and green from the native buffer, blue always zero), releases the
native buffer and saves the result as a timestamped PNG.

Examples:
  flame probe                           # Handshake with the native side
  flame generate                        # 5120x5120 into the current dir
  flame generate -W 640 -H 480 -o out   # Smaller image into ./out
  flame -vv generate --json             # Debug logging, JSON report
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the native generator's diagnostic string
    #[command(visible_alias = "p")]
    Probe,

    /// Generate, decode and save one image
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),
}

/// Arguments for the `generate` command.
#[derive(Args)]
struct GenerateArgs {
    /// Image width in pixels
    #[arg(short = 'W', long, default_value = "5120")]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value = "5120")]
    height: u32,

    /// Output directory (created if missing)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// File name suffix: <timestamp>_<suffix>.png
    #[arg(long, default_value = flame_io::DEFAULT_SUFFIX)]
    suffix: String,

    /// Warn when native generation takes longer than this
    #[arg(long, default_value = "2000")]
    slow_acquire_ms: u64,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Probe => commands::probe::run(cli.verbose),
        Commands::Generate(args) => commands::generate::run(args, cli.verbose),
    }
}

/// Default filter directive for a `-v` count.
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber: stderr always, plus `log_file` if given.
///
/// The returned guard flushes the file writer on drop and must outlive
/// all logging.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["flame", "generate"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!((args.width, args.height), (5120, 5120));
        assert_eq!(args.suffix, "rgout");
        assert_eq!(args.slow_acquire_ms, 2000);
        assert!(!args.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["flame", "generate", "-W", "8", "-H", "4", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!((args.width, args.height), (8, 4));
        assert!(args.json);
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(2), "debug");
        assert_eq!(default_level(9), "trace");
    }
}
