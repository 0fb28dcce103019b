//! Memory-Mapped IO Devices.
//!
//! This module contains the behavioural models of the peripherals the bus routes
//! to: the timer, the serial transmitter and the VGA register file. Each one is a
//! small independent register file owned by the bus.

/// Serial transmitter.
pub mod serial;

/// Timer compare/enable register file.
pub mod timer;

/// VGA control, upload and palette registers.
pub mod vga;

pub use serial::Serial;
pub use timer::Timer;
pub use vga::Vga;

pub use crate::soc::traits::Device;
