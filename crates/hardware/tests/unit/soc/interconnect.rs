//! Bus router unit tests.
//!
//! Verifies selector routing, device-base subtraction, unmapped selectors
//! falling through to memory, edge-gated writes and read latency.

use std::collections::HashMap;

use cosim_core::common::constants::{SELECT_SERIAL, SELECT_TIMER, SELECT_VGA};
use cosim_core::common::{BusAddr, Edge, Level};
use cosim_core::soc::devices::{Device, Serial, Timer, Vga};
use cosim_core::soc::interconnect::{Bus, BusTransaction, Route};
use cosim_core::soc::memory::{ByteLanes, FlatMemory};
use proptest::prelude::*;

use crate::common::mocks::output::SharedBuffer;

fn make_bus() -> (Bus, SharedBuffer) {
    let out = SharedBuffer::new();
    let mut bus = Bus::new(FlatMemory::new(0x1000));
    bus.attach(SELECT_VGA, Box::new(Vga::new(0x3000_0000)));
    bus.attach(
        SELECT_SERIAL,
        Box::new(Serial::with_sink(0x4000_0000, Box::new(out.clone()))),
    );
    bus.attach(SELECT_TIMER, Box::new(Timer::new(0x7000_0000)));
    (bus, out)
}

/// Drives one full clock cycle (low then high) with `txn` on the bus.
fn clock_in(bus: &mut Bus, txn: &BusTransaction) {
    let _ = bus.evaluate(Level::Low, txn);
    let _ = bus.evaluate(Level::High, txn);
}

// ══════════════════════════════════════════════════════════
// 1. Routing
// ══════════════════════════════════════════════════════════

#[test]
fn memory_selector_routes_to_memory() {
    let (bus, _) = make_bus();
    assert_eq!(
        bus.route(BusAddr::from_raw(0x0000_2000)),
        Route::Memory(0x2000)
    );
}

#[test]
fn device_offsets_subtract_base() {
    let (bus, _) = make_bus();
    assert_eq!(
        bus.route(BusAddr::from_raw(0x7000_0008)),
        Route::Device {
            selector: SELECT_TIMER,
            offset: 0x8
        }
    );
    assert_eq!(
        bus.route(BusAddr::from_raw(0x4000_0010)),
        Route::Device {
            selector: SELECT_SERIAL,
            offset: 0x10
        }
    );
}

#[test]
fn unmapped_selectors_fall_through_to_memory() {
    let (mut bus, _) = make_bus();
    clock_in(&mut bus, &BusTransaction::write(0xA000_0100, 0x55));
    assert_eq!(bus.memory().read(0x100), 0x55);
    assert_eq!(bus.write_counts()[0], 1);
}

#[test]
fn selector_pin_wins_over_address_bits() {
    let (mut bus, out) = make_bus();
    let txn = BusTransaction {
        address: 0x0000_0010,
        device_select: SELECT_SERIAL,
        write_enable: true,
        lanes: ByteLanes::ALL,
        write_data: u32::from(b'!'),
    };
    clock_in(&mut bus, &txn);
    assert_eq!(out.text(), "!");
}

#[test]
fn attach_rejects_memory_selector() {
    let mut bus = Bus::new(FlatMemory::new(16));
    bus.attach(0, Box::new(Timer::new(0)));
    assert!(bus.device(0).is_none());
}

#[test]
fn device_lookup_by_selector() {
    let (bus, _) = make_bus();
    assert_eq!(bus.device(SELECT_TIMER).map(|d| d.name()), Some("TIMER"));
    assert!(bus.device(5).is_none());
    assert!(bus.vga().is_some());
    assert!(bus.serial().is_some());
}

// ══════════════════════════════════════════════════════════
// 2. Edge gating
// ══════════════════════════════════════════════════════════

#[test]
fn writes_commit_only_on_rising_edge() {
    let (mut bus, _) = make_bus();
    let txn = BusTransaction::write(0x40, 0xDEAD_BEEF);

    assert_eq!(bus.evaluate(Level::Low, &txn).0, Edge::Steady);
    assert_eq!(bus.memory().read(0x40), 0);

    assert_eq!(bus.evaluate(Level::High, &txn).0, Edge::Rising);
    assert_eq!(bus.memory().read(0x40), 0xDEAD_BEEF);

    let later = BusTransaction::write(0x40, 0x1111_1111);
    assert_eq!(bus.evaluate(Level::High, &later).0, Edge::Steady);
    assert_eq!(bus.evaluate(Level::Low, &later).0, Edge::Falling);
    assert_eq!(bus.memory().read(0x40), 0xDEAD_BEEF);
}

#[test]
fn serial_byte_is_emitted_once_per_edge() {
    let (mut bus, out) = make_bus();
    let txn = BusTransaction::write(0x4000_0010, u32::from(b'H'));
    for _ in 0..3 {
        let _ = bus.evaluate(Level::High, &txn);
    }
    let _ = bus.evaluate(Level::Low, &txn);
    let _ = bus.evaluate(Level::High, &txn);
    assert_eq!(out.text(), "HH");
}

#[test]
fn read_returns_value_after_commit() {
    let (mut bus, _) = make_bus();
    let txn = BusTransaction::write(0x7000_0004, 1234);
    let _ = bus.evaluate(Level::Low, &txn);
    let (_, read) = bus.evaluate(Level::High, &txn);
    assert_eq!(read, 1234);
}

#[test]
fn device_reads_route_through_bus() {
    let (mut bus, _) = make_bus();
    clock_in(&mut bus, &BusTransaction::write(0x3000_0004, 1));
    assert_eq!(bus.read(&BusTransaction::read(0x3000_0004)), 1);
    assert_eq!(bus.read(&BusTransaction::read(0x4000_0004)), 115_200);
    assert_eq!(bus.read(&BusTransaction::read(0x7000_0100)), 0);
}

#[test]
fn fetch_never_reaches_devices() {
    let (mut bus, out) = make_bus();
    bus.memory_mut().write(0x10, 0x0000_0013, ByteLanes::ALL);
    assert_eq!(bus.fetch(0x10), 0x13);
    let _ = bus.fetch(0x4000_0010);
    assert!(out.bytes().is_empty());
}

proptest! {
    /// Memory only changes when the previous sample was low and the current one high.
    #[test]
    fn edge_gating_law(
        steps in prop::collection::vec((any::<bool>(), 0u32..16, any::<u32>(), any::<bool>()), 1..64)
    ) {
        let mut bus = Bus::new(FlatMemory::new(16));
        let mut expected: HashMap<u32, u32> = HashMap::new();
        let mut prev = Level::Low;

        for (clock, word, data, write_enable) in steps {
            let level = Level::from(clock);
            let mut txn = BusTransaction::write(word * 4, data);
            txn.write_enable = write_enable;
            let (edge, _) = bus.evaluate(level, &txn);

            let rising = prev == Level::Low && level == Level::High;
            prop_assert_eq!(edge == Edge::Rising, rising);
            if rising && write_enable {
                let _ = expected.insert(word * 4, data);
            }
            prev = level;
        }

        for word in 0..16u32 {
            let addr = word * 4;
            prop_assert_eq!(bus.memory().read(addr), expected.get(&addr).copied().unwrap_or(0));
        }
    }
}
