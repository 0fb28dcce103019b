//! Timer register file.
//!
//! A passive compare/enable register pair. The countdown and interrupt logic live
//! in the core model; firmware re-arms the timer by rewriting the compare limit
//! from its trap handler.
//!
//! # Memory Map
//!
//! * `0x4`: LIMIT (compare value)
//! * `0x8`: ENABLE (non-zero enables)

use crate::soc::devices::Device;

/// Offset for the compare-limit register.
pub const LIMIT_OFFSET: u32 = 0x4;
/// Offset for the enable register.
pub const ENABLE_OFFSET: u32 = 0x8;

/// Timer device structure.
#[derive(Debug, Default)]
pub struct Timer {
    /// Base physical address of the device.
    base_addr: u32,
    /// Compare limit written by firmware.
    limit: u32,
    /// Whether firmware has enabled the timer.
    enabled: bool,
}

impl Timer {
    /// Creates a new timer with the limit cleared and the timer disabled.
    pub fn new(base_addr: u32) -> Self {
        Self {
            base_addr,
            limit: 0,
            enabled: false,
        }
    }

    /// Returns the last compare limit written.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns whether the timer is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl Device for Timer {
    fn name(&self) -> &str {
        "TIMER"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, 0x10)
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        match offset {
            LIMIT_OFFSET => self.limit,
            ENABLE_OFFSET => u32::from(self.enabled),
            _ => 0,
        }
    }

    fn write_u32(&mut self, offset: u32, val: u32) {
        match offset {
            LIMIT_OFFSET => self.limit = val,
            ENABLE_OFFSET => self.enabled = val != 0,
            _ => {}
        }
    }
}
