//! Handshake with the native generator.

use anyhow::Result;
use tracing::trace;

/// Prints the native diagnostic string.
pub fn run(verbose: u8) -> Result<()> {
    trace!("probe::run");
    let orchestrator = super::native_orchestrator();
    let text = orchestrator.handshake();
    if verbose > 0 {
        println!("flame {}", env!("CARGO_PKG_VERSION"));
    }
    println!("{text}");
    Ok(())
}
