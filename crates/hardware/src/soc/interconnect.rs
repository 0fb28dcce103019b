//! System interconnect (bus router) for memory and MMIO access.
//!
//! This module implements the router between the core model's data port and the
//! backing components. It provides:
//! 1. **Decoding:** Each transaction is split into device selector and local offset.
//! 2. **Routing:** Selector 0 and every unmapped selector go to flat memory; mapped
//!    selectors go to their device with the device base subtracted.
//! 3. **Edge-gated writes:** Writes are committed only when the router observes a
//!    rising clock edge, mirroring register files that latch on the edge.
//! 4. **Combinational reads:** The read value is recomputed on every evaluation and
//!    presented to the core model on the following one.

use crate::common::addr::BusAddr;
use crate::common::constants::DEVICE_SELECT_BITS;
use crate::common::signal::{Edge, EdgeDetector, Level};
use crate::soc::devices::{Device, Serial, Vga};
use crate::soc::memory::{ByteLanes, FlatMemory};

/// Number of selector values.
const SLOTS: usize = 1 << DEVICE_SELECT_BITS;

/// Data-port bundle sampled from the core model after an evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusTransaction {
    /// Address pin (selector bits are taken from `device_select`).
    pub address: u32,
    /// Device-select pin.
    pub device_select: u8,
    /// Write enable.
    pub write_enable: bool,
    /// Byte lanes from the four write strobes.
    pub lanes: ByteLanes,
    /// Write data.
    pub write_data: u32,
}

impl BusTransaction {
    /// Builds a full-word write to a raw address, taking the selector from its top bits.
    pub fn write(address: u32, data: u32) -> Self {
        Self {
            address,
            device_select: BusAddr::from_raw(address).selector,
            write_enable: true,
            lanes: ByteLanes::ALL,
            write_data: data,
        }
    }

    /// Builds a read of a raw address, taking the selector from its top bits.
    pub fn read(address: u32) -> Self {
        Self {
            address,
            device_select: BusAddr::from_raw(address).selector,
            ..Self::default()
        }
    }

    /// Returns the decoded address.
    pub fn decoded(&self) -> BusAddr {
        BusAddr::decode(self.address, self.device_select)
    }
}

/// Where a decoded transaction lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Flat memory at the given effective address.
    Memory(u32),
    /// The device attached at `selector`, at a device-relative offset.
    Device {
        /// Device selector.
        selector: u8,
        /// Offset from the device base.
        offset: u32,
    },
}

/// Bus router owning flat memory and every peripheral.
pub struct Bus {
    memory: FlatMemory,
    devices: [Option<Box<dyn Device>>; SLOTS],
    clock: EdgeDetector,
    write_counts: [u64; SLOTS],
}

impl Bus {
    /// Creates a bus with only flat memory attached.
    pub fn new(memory: FlatMemory) -> Self {
        Self {
            memory,
            devices: std::array::from_fn(|_| None),
            clock: EdgeDetector::new(Level::Low),
            write_counts: [0; SLOTS],
        }
    }

    /// Attaches `dev` at `selector`, replacing any device already there.
    ///
    /// Selector 0 always routes to memory; attaching there is ignored.
    pub fn attach(&mut self, selector: u8, dev: Box<dyn Device>) {
        let slot = usize::from(selector);
        if slot == 0 || slot >= SLOTS {
            tracing::warn!(selector, device = dev.name(), "selector cannot host a device");
            return;
        }
        tracing::debug!(
            selector,
            device = dev.name(),
            base = format_args!("{:#010x}", dev.address_range().0),
            "device attached"
        );
        self.devices[slot] = Some(dev);
    }

    /// Returns flat memory.
    pub fn memory(&self) -> &FlatMemory {
        &self.memory
    }

    /// Returns flat memory mutably (boot loading, test pokes).
    pub fn memory_mut(&mut self) -> &mut FlatMemory {
        &mut self.memory
    }

    /// Returns the device at `selector`, if any.
    pub fn device(&self, selector: u8) -> Option<&dyn Device> {
        self.devices.get(usize::from(selector))?.as_deref()
    }

    /// Returns the device at `selector` mutably, if any.
    pub fn device_mut(&mut self, selector: u8) -> Option<&mut (dyn Device + 'static)> {
        self.devices.get_mut(usize::from(selector))?.as_deref_mut()
    }

    /// Returns the first attached VGA register file.
    pub fn vga(&self) -> Option<&Vga> {
        self.devices.iter().flatten().find_map(|d| d.as_vga())
    }

    /// Returns the first attached serial transmitter.
    pub fn serial(&self) -> Option<&Serial> {
        self.devices.iter().flatten().find_map(|d| d.as_serial())
    }

    /// Returns the number of committed writes per selector route (index 0 is memory).
    pub fn write_counts(&self) -> &[u64; SLOTS] {
        &self.write_counts
    }

    /// Resolves a decoded address to memory or a device offset.
    pub fn route(&self, addr: BusAddr) -> Route {
        let effective = addr.effective();
        match self.device(addr.selector) {
            Some(dev) => Route::Device {
                selector: addr.selector,
                offset: effective.wrapping_sub(dev.address_range().0),
            },
            None => Route::Memory(effective),
        }
    }

    /// Applies `txn` immediately if it is a write. Edge gating is the caller's job;
    /// see [`evaluate`](Self::evaluate).
    pub fn commit_write(&mut self, txn: &BusTransaction) {
        if !txn.write_enable {
            return;
        }
        match self.route(txn.decoded()) {
            Route::Memory(addr) => {
                self.memory.write(addr, txn.write_data, txn.lanes);
                self.write_counts[0] += 1;
            }
            Route::Device { selector, offset } => {
                if let Some(dev) = self.device_mut(selector) {
                    tracing::debug!(
                        device = dev.name(),
                        offset = format_args!("{offset:#x}"),
                        data = format_args!("{:#010x}", txn.write_data),
                        "mmio write"
                    );
                    dev.write_u32(offset, txn.write_data);
                }
                self.write_counts[usize::from(selector)] += 1;
            }
        }
    }

    /// Computes the combinational read value for the address currently on the bus.
    pub fn read(&mut self, txn: &BusTransaction) -> u32 {
        match self.route(txn.decoded()) {
            Route::Memory(addr) => self.memory.read(addr),
            Route::Device { selector, offset } => self
                .device_mut(selector)
                .map_or(0, |dev| dev.read_u32(offset)),
        }
    }

    /// Reads the instruction word at `address` on the fetch path.
    pub fn fetch(&self, address: u32) -> u32 {
        self.memory.read_instruction(address)
    }

    /// Samples the clock and returns the observed edge without touching any state
    /// other than the edge detector.
    pub fn sample_clock(&mut self, clock: Level) -> Edge {
        self.clock.sample(clock)
    }

    /// One evaluation of the router.
    ///
    /// Samples `clock`; on a rising edge the pending write in `txn` is committed.
    /// Then the read value for `txn`'s address is recomputed and returned, to be
    /// presented to the core model on the next evaluation. Writes seen on
    /// low-to-low, high-to-high or falling transitions are discarded.
    pub fn evaluate(&mut self, clock: Level, txn: &BusTransaction) -> (Edge, u32) {
        let edge = self.sample_clock(clock);
        if edge == Edge::Rising {
            self.commit_write(txn);
        }
        (edge, self.read(txn))
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.devices.iter().flatten().map(|d| d.name()).collect();
        f.debug_struct("Bus")
            .field("memory_words", &self.memory.capacity_words())
            .field("devices", &names)
            .field("clock", &self.clock.level())
            .finish_non_exhaustive()
    }
}
