//! Cycle-driven co-simulation harness library.
//!
//! This crate runs a clock-stepped processor core model against a simulated
//! memory and peripheral bus:
//! 1. **Core:** The `CoreModel` pin-level port and a stimulus replay model.
//! 2. **SoC:** Flat memory, the bus router, and the timer, serial and VGA register files.
//! 3. **Video:** Pixel sink, VGA scanout and frame presenters.
//! 4. **Simulation:** Clock sequencer, boot loading, VCD tracing and signature extraction.
//! 5. **Support:** Configuration, error types and run statistics.

/// Common types and constants (address decoding, signals, errors).
pub mod common;
/// Run configuration (defaults, hierarchical config structures, number parsing).
pub mod config;
/// Core model port (pins, evaluation trait, replay model).
pub mod core;
/// Simulation driver (sequencer, loader, VCD, signature).
pub mod sim;
/// System-on-chip (builder, bus, devices, memory, traits).
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;
/// Display pipeline (pixel sink, scanout, presenters).
pub mod video;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Core model trait; implement it to plug a processor model into the harness.
pub use crate::core::CoreModel;
/// Clock sequencer; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Top-level system (bus, memory, devices); construct with `System::new`.
pub use crate::soc::System;
