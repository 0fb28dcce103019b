//! # VGA Register File Tests
//!
//! Verifies control bits, streaming VRAM upload with post-increment, the
//! palette, and colour lookup under the packed-index layout.

use cosim_core::soc::devices::Device;
use cosim_core::soc::devices::vga::{
    CTRL_BLANK, CTRL_ENABLE, CTRL_OFFSET, PALETTE_OFFSET, STREAM_DATA_OFFSET, UPLOAD_ADDR_OFFSET,
    VRAM_WIDTH, VRAM_WORDS, Vga,
};

fn enabled_vga() -> Vga {
    let mut vga = Vga::new(0x3000_0000);
    vga.write_u32(CTRL_OFFSET, CTRL_ENABLE);
    vga
}

#[test]
fn vga_starts_disabled() {
    let vga = Vga::new(0x3000_0000);
    assert_eq!(vga.name(), "VGA");
    assert!(!vga.is_displaying());
    assert_eq!(vga.color_at(0, 0), 0);
}

#[test]
fn blank_overrides_enable() {
    let mut vga = enabled_vga();
    vga.write_u32(PALETTE_OFFSET, 0x3F);
    assert_eq!(vga.color_at(0, 0), 0x3F);
    vga.write_u32(CTRL_OFFSET, CTRL_ENABLE | CTRL_BLANK);
    assert!(!vga.is_displaying());
    assert_eq!(vga.color_at(0, 0), 0);
}

#[test]
fn control_keeps_only_defined_bits() {
    let mut vga = Vga::new(0);
    vga.write_u32(CTRL_OFFSET, 0xFFFF_FFFF);
    assert_eq!(vga.read_u32(CTRL_OFFSET), CTRL_ENABLE | CTRL_BLANK);
}

#[test]
fn stream_writes_post_increment() {
    let mut vga = enabled_vga();
    vga.write_u32(UPLOAD_ADDR_OFFSET, 10);
    vga.write_u32(STREAM_DATA_OFFSET, 0x1111_1111);
    vga.write_u32(STREAM_DATA_OFFSET, 0x2222_2222);
    assert_eq!(vga.vram_word(10), 0x1111_1111);
    assert_eq!(vga.vram_word(11), 0x2222_2222);
    assert_eq!(vga.read_u32(UPLOAD_ADDR_OFFSET), 12);
}

#[test]
fn stream_past_end_is_dropped() {
    let mut vga = enabled_vga();
    vga.write_u32(UPLOAD_ADDR_OFFSET, VRAM_WORDS as u32);
    vga.write_u32(STREAM_DATA_OFFSET, 0xFFFF_FFFF);
    assert_eq!(vga.vram_word(VRAM_WORDS), 0);
    assert_eq!(vga.read_u32(UPLOAD_ADDR_OFFSET), VRAM_WORDS as u32 + 1);
}

#[test]
fn packed_indices_are_low_byte_first() {
    let mut vga = enabled_vga();
    vga.write_u32(UPLOAD_ADDR_OFFSET, 0);
    vga.write_u32(STREAM_DATA_OFFSET, 0x0403_0201);
    assert_eq!(
        (0..4).map(|x| vga.index_at(x, 0)).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn second_row_starts_at_word_eighty() {
    let mut vga = enabled_vga();
    vga.write_u32(UPLOAD_ADDR_OFFSET, VRAM_WIDTH / 4);
    vga.write_u32(STREAM_DATA_OFFSET, 0x0000_0007);
    assert_eq!(vga.index_at(0, 1), 7);
    assert_eq!(vga.index_at(0, 0), 0);
}

#[test]
fn palette_is_six_bit() {
    let mut vga = enabled_vga();
    vga.write_u32(PALETTE_OFFSET + 4 * 9, 0xFF);
    assert_eq!(vga.read_u32(PALETTE_OFFSET + 4 * 9), 0x3F);
    vga.write_u32(UPLOAD_ADDR_OFFSET, 0);
    vga.write_u32(STREAM_DATA_OFFSET, 9);
    assert_eq!(vga.color_at(0, 0), 0x3F);
}

#[test]
fn out_of_raster_index_is_zero() {
    let vga = enabled_vga();
    assert_eq!(vga.index_at(320, 0), 0);
    assert_eq!(vga.index_at(0, 200), 0);
}
