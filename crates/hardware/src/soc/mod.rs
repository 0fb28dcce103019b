//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components behind the core model's data port:
//! the bus router, flat memory, the peripheral register files, and the builder
//! that assembles them from configuration.

/// System builder for assembling SoC components.
pub mod builder;

/// Memory-mapped I/O device implementations.
pub mod devices;

/// System bus interconnect and routing.
pub mod interconnect;

/// Flat word-addressed memory.
pub mod memory;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use builder::System;
