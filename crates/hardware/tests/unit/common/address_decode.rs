//! # Address Decoding Tests
//!
//! Verifies selector extraction for every device base and that the
//! effective address survives a decode round trip.

use cosim_core::common::BusAddr;
use cosim_core::common::constants::{
    SELECT_MEMORY, SELECT_SERIAL, SELECT_TIMER, SELECT_VGA, SERIAL_BASE, TIMER_BASE, VGA_BASE,
};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(0x0000_1000, SELECT_MEMORY)]
#[case(VGA_BASE, SELECT_VGA)]
#[case(SERIAL_BASE + 0x10, SELECT_SERIAL)]
#[case(TIMER_BASE + 0x8, SELECT_TIMER)]
#[case(0x8000_0000, 4)]
#[case(0xFFFF_FFFC, 7)]
fn selector_is_top_three_bits(#[case] address: u32, #[case] selector: u8) {
    assert_eq!(BusAddr::from_raw(address).selector, selector);
}

#[test]
fn selector_pin_is_masked_to_three_bits() {
    assert_eq!(BusAddr::decode(0, 0xFA).selector, 2);
}

proptest! {
    #[test]
    fn effective_address_round_trips(address in any::<u32>()) {
        prop_assert_eq!(BusAddr::from_raw(address).effective(), address);
    }
}
