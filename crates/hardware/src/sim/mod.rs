//! Simulation driver and observation outputs.
//!
//! Provides the clock sequencer that drives a core model against the system,
//! boot image and ELF loading, and the two outputs a run can leave behind: a
//! VCD waveform and a compliance signature.

/// Boot image and ELF symbol loading.
pub mod loader;

/// Compliance signature extraction.
pub mod signature;

/// Clock sequencer and run lifecycle.
pub mod simulator;

/// Value Change Dump waveform writer.
pub mod vcd;

pub use simulator::{HaltReason, RunState, RunSummary, Simulator};
