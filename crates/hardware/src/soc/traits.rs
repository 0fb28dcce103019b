//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by every bus-attached peripheral. It provides:
//! 1. **Identification:** `name` and `address_range` for routing diagnostics.
//! 2. **Access:** Word read/write at device-relative offsets.
//! 3. **Downcasting:** Optional casts to the VGA register file (scanout) and the serial
//!    transmitter (statistics).
//!
//! The bus owns each device exclusively and only talks to it through this trait, so a
//! peripheral can be unit-tested in isolation by feeding it synthetic offsets and values.

use crate::soc::devices::{Serial, Vga};

/// Trait for memory-mapped I/O devices attached to the system bus.
///
/// Offsets are relative to the device base. Offsets a device does not decode must
/// read as zero and ignore writes; a device never reports an error to the bus.
pub trait Device: Send {
    /// Returns a short name for this device (e.g., `"TIMER"`, `"SERIAL"`).
    fn name(&self) -> &str;
    /// Returns (base_address, size_in_bytes) for this device's register window.
    fn address_range(&self) -> (u32, u32);
    /// Reads the 32-bit register at the given device-relative offset.
    fn read_u32(&mut self, offset: u32) -> u32;
    /// Writes the 32-bit register at the given device-relative offset.
    fn write_u32(&mut self, offset: u32, val: u32);

    /// Returns a reference as `Vga` if this device is the VGA register file; otherwise `None`.
    fn as_vga(&self) -> Option<&Vga> {
        None
    }

    /// Returns a reference as `Serial` if this device is the serial transmitter; otherwise `None`.
    fn as_serial(&self) -> Option<&Serial> {
        None
    }
}
