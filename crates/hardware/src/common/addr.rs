//! Bus address decoding.
//!
//! A raw 32-bit address is split into a device selector (the top
//! [`DEVICE_SELECT_BITS`](super::constants::DEVICE_SELECT_BITS) bits) and a
//! device-local offset. The core model reports the selector on its own pin, so
//! decoding always reassembles the effective address from that pin plus the
//! local part of the address pin.

use super::constants::{DEVICE_MASK, DEVICE_SELECT_BITS, DEVICE_SHIFT};

/// A decoded bus address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusAddr {
    /// Device selector (0 = memory, 1 = VGA, 2 = serial, 3 = timer, others unmapped).
    pub selector: u8,
    /// Address bits below the selector field.
    pub local: u32,
}

impl BusAddr {
    /// Decodes a bus address from the address pin and the device-select pin.
    #[inline]
    pub fn decode(address: u32, device_select: u8) -> Self {
        Self {
            selector: device_select & ((1 << DEVICE_SELECT_BITS) - 1),
            local: address & DEVICE_MASK,
        }
    }

    /// Decodes a bus address using the selector carried in the address itself.
    #[inline]
    pub fn from_raw(address: u32) -> Self {
        Self {
            selector: (address >> DEVICE_SHIFT) as u8,
            local: address & DEVICE_MASK,
        }
    }

    /// Reassembles `selector << DEVICE_SHIFT | local`.
    #[inline]
    pub fn effective(&self) -> u32 {
        (u32::from(self.selector) << DEVICE_SHIFT) | self.local
    }
}
