//! System construction and top-level `System` type.
//!
//! This module builds the bus and everything behind it from configuration. It performs:
//! 1. **Memory allocation:** Creates flat memory with the configured capacity.
//! 2. **Device registration:** Attaches the VGA register file, serial transmitter and
//!    timer at their selectors.
//! 3. **Boot loading:** Optionally loads a raw boot image at the load offset; an image
//!    that does not fit is a fatal configuration error.

use std::io::{self, Write};

use crate::common::constants::{
    SELECT_SERIAL, SELECT_TIMER, SELECT_VGA, SERIAL_BASE, TIMER_BASE, VGA_BASE,
};
use crate::common::error::Result;
use crate::config::Config;
use crate::sim::loader;
use crate::soc::devices::{Serial, Timer, Vga};
use crate::soc::interconnect::Bus;
use crate::soc::memory::FlatMemory;

/// Top-level system instance: the bus with memory and peripherals attached.
#[derive(Debug)]
pub struct System {
    /// System interconnect; owns memory and every MMIO device.
    pub bus: Bus,
}

impl System {
    /// Builds a system whose serial output goes to stdout.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration (memory size, boot image, load offset).
    ///
    /// # Errors
    ///
    /// Returns an error if the boot image cannot be read or does not fit.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_serial_sink(config, Box::new(io::stdout()))
    }

    /// Builds a system whose serial output goes to `serial_out`.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration.
    /// * `serial_out` - Destination for bytes written to the serial transmit register.
    ///
    /// # Errors
    ///
    /// Returns an error if the boot image cannot be read or does not fit.
    pub fn with_serial_sink(config: &Config, serial_out: Box<dyn Write + Send>) -> Result<Self> {
        let mut memory = FlatMemory::new(config.memory.words);
        if let Some(path) = &config.memory.boot_image {
            let _ = loader::load_boot_image(&mut memory, path, config.memory.load_offset)?;
        }

        let mut bus = Bus::new(memory);
        bus.attach(SELECT_VGA, Box::new(Vga::new(VGA_BASE)));
        bus.attach(
            SELECT_SERIAL,
            Box::new(Serial::with_sink(SERIAL_BASE, serial_out)),
        );
        bus.attach(SELECT_TIMER, Box::new(Timer::new(TIMER_BASE)));

        tracing::debug!(
            memory_words = config.memory.words,
            "system assembled"
        );
        Ok(Self { bus })
    }

    /// Loads raw bytes into memory at `offset`, bypassing the capacity check.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw bytes to write.
    /// * `offset` - Byte address of the first byte.
    pub fn load_binary_at(&mut self, data: &[u8], offset: u32) {
        self.bus.memory_mut().load_image(data, offset);
    }

    /// Number of bytes the serial transmitter has emitted.
    pub fn serial_bytes(&self) -> u64 {
        self.bus.serial().map_or(0, Serial::tx_count)
    }
}
