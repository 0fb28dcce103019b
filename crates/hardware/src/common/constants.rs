//! Global Harness Constants.
//!
//! This module defines the system-wide constants shared by the bus, the devices
//! and the clock sequencer. It includes:
//! 1. **Address Map:** Device-select field geometry and the per-device base addresses.
//! 2. **Memory Constants:** The addressable window and default capacities.
//! 3. **Protocol Constants:** The halt sentinel and reset length.

/// Number of high address bits that carry the device selector.
pub const DEVICE_SELECT_BITS: u32 = 3;

/// Bit position of the device selector within a 32-bit address.
pub const DEVICE_SHIFT: u32 = 32 - DEVICE_SELECT_BITS;

/// Mask for the device-local part of an address.
pub const DEVICE_MASK: u32 = (1 << DEVICE_SHIFT) - 1;

/// Device selector for main memory.
pub const SELECT_MEMORY: u8 = 0;

/// Device selector for the VGA register file / pixel device.
pub const SELECT_VGA: u8 = 1;

/// Device selector for the serial transmitter.
pub const SELECT_SERIAL: u8 = 2;

/// Device selector for the timer.
pub const SELECT_TIMER: u8 = 3;

/// Base address of the VGA register file (selector 1).
pub const VGA_BASE: u32 = 0x3000_0000;

/// Base address of the serial transmitter (selector 2).
pub const SERIAL_BASE: u32 = 0x4000_0000;

/// Base address of the timer (selector 3).
pub const TIMER_BASE: u32 = 0x7000_0000;

/// Mask applied to every memory address before it is turned into a word index.
pub const MEMORY_WINDOW_MASK: u32 = 0x0FFF_FFFF;

/// Size of one memory word in bytes.
pub const WORD_BYTES: usize = 4;

/// Magic word written by guest software to the halt-check address to end a run.
pub const HALT_SENTINEL: u32 = 0xBABE_CAFE;

/// Number of simulated cycles during which reset stays asserted.
pub const RESET_CYCLES: u64 = 2;

/// Default boot image load offset and initial fetch address.
pub const DEFAULT_ENTRY: u32 = 0x1000;
