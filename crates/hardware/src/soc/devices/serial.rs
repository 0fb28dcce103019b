//! Serial transmitter.
//!
//! The only channel through which guest firmware produces text. A write to the
//! transmit register emits one byte to the output stream and flushes it at once;
//! there is no FIFO, no flow control and no transmit interrupt. The remaining
//! registers are configuration only.
//!
//! # Memory Map
//!
//! * `0x04`: BAUD (informational)
//! * `0x08`: ENABLE
//! * `0x0C`: RX (last received byte, read-only)
//! * `0x10`: TX (write-only, emits `value & 0xFF`)

use std::fmt;
use std::io::{self, Write};

use crate::soc::devices::Device;

/// Baud rate register.
pub const BAUD_OFFSET: u32 = 0x04;
/// Enable register.
pub const ENABLE_OFFSET: u32 = 0x08;
/// Receive register.
pub const RX_OFFSET: u32 = 0x0C;
/// Transmit register.
pub const TX_OFFSET: u32 = 0x10;

/// Reset value of the baud register.
const DEFAULT_BAUD: u32 = 115_200;

/// Serial device structure.
pub struct Serial {
    /// Base physical address of the device.
    base_addr: u32,
    /// Baud rate; has no behavioural effect.
    baud: u32,
    /// Enable register.
    enabled: bool,
    /// Last received byte. Nothing in the harness drives the receive side.
    last_rx: u8,
    /// Destination for transmitted bytes.
    sink: Box<dyn Write + Send>,
    /// Number of bytes transmitted so far.
    tx_count: u64,
    /// Set after the first failed write so the error is reported once.
    sink_failed: bool,
}

impl Serial {
    /// Creates a serial device that transmits to `stdout`.
    pub fn new(base_addr: u32) -> Self {
        Self::with_sink(base_addr, Box::new(io::stdout()))
    }

    /// Creates a serial device that transmits to the given writer.
    pub fn with_sink(base_addr: u32, sink: Box<dyn Write + Send>) -> Self {
        Self {
            base_addr,
            baud: DEFAULT_BAUD,
            enabled: false,
            last_rx: 0,
            sink,
            tx_count: 0,
            sink_failed: false,
        }
    }

    /// Returns the number of bytes transmitted.
    pub fn tx_count(&self) -> u64 {
        self.tx_count
    }

    /// Returns whether firmware enabled the port.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn transmit(&mut self, byte: u8) {
        self.tx_count += 1;
        if self.sink_failed {
            return;
        }
        let result = self
            .sink
            .write_all(&[byte])
            .and_then(|()| self.sink.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "serial output stream failed; further bytes are dropped");
            self.sink_failed = true;
        }
    }
}

impl fmt::Debug for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serial")
            .field("base_addr", &self.base_addr)
            .field("baud", &self.baud)
            .field("enabled", &self.enabled)
            .field("last_rx", &self.last_rx)
            .field("tx_count", &self.tx_count)
            .finish_non_exhaustive()
    }
}

impl Device for Serial {
    fn name(&self) -> &str {
        "SERIAL"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, 0x20)
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        match offset {
            BAUD_OFFSET => self.baud,
            ENABLE_OFFSET => u32::from(self.enabled),
            RX_OFFSET => u32::from(self.last_rx),
            _ => 0,
        }
    }

    fn write_u32(&mut self, offset: u32, val: u32) {
        match offset {
            BAUD_OFFSET => self.baud = val,
            ENABLE_OFFSET => self.enabled = val != 0,
            TX_OFFSET => self.transmit((val & 0xFF) as u8),
            _ => {}
        }
    }

    fn as_serial(&self) -> Option<&Serial> {
        Some(self)
    }
}
