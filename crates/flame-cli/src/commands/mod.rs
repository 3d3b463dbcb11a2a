//! CLI command implementations

pub mod generate;
pub mod probe;

use flame_core::Orchestrator;
use flame_ffi::NativeGenerator;

/// Orchestrator bound to the bundled native generator.
pub fn native_orchestrator() -> Orchestrator<NativeGenerator> {
    Orchestrator::new(NativeGenerator)
}
