//! VGA register file.
//!
//! Holds the display state firmware programs over MMIO: a control register, a
//! streaming upload port into an indexed-colour VRAM, and a 256-entry palette of
//! 6-bit `RRGGBB` colours. Each VRAM word packs four 8-bit palette indices, the
//! lowest byte being the leftmost pixel.
//!
//! # Memory Map
//!
//! * `0x004`: CTRL (bit 0 enable, bit 1 blank)
//! * `0x010`: UPLOAD_ADDR (VRAM word index for the next stream write)
//! * `0x014`: STREAM_DATA (write stores one VRAM word and post-increments UPLOAD_ADDR)
//! * `0x400..0x7FC`: PALETTE (256 word-sized entries)

use crate::soc::devices::Device;

/// Control register offset.
pub const CTRL_OFFSET: u32 = 0x004;
/// Upload address register offset.
pub const UPLOAD_ADDR_OFFSET: u32 = 0x010;
/// Stream data register offset.
pub const STREAM_DATA_OFFSET: u32 = 0x014;
/// First palette entry offset.
pub const PALETTE_OFFSET: u32 = 0x400;
/// Number of palette entries.
pub const PALETTE_ENTRIES: usize = 256;

/// CTRL bit 0: output enable.
pub const CTRL_ENABLE: u32 = 1 << 0;
/// CTRL bit 1: force blank output.
pub const CTRL_BLANK: u32 = 1 << 1;

/// Native width of the indexed framebuffer in pixels.
pub const VRAM_WIDTH: u32 = 320;
/// Native height of the indexed framebuffer in pixels.
pub const VRAM_HEIGHT: u32 = 200;
/// Number of packed VRAM words (four pixels per word).
pub const VRAM_WORDS: usize = (VRAM_WIDTH * VRAM_HEIGHT / 4) as usize;

const PALETTE_END: u32 = PALETTE_OFFSET + (PALETTE_ENTRIES as u32) * 4;

/// VGA device structure.
#[derive(Debug)]
pub struct Vga {
    base_addr: u32,
    ctrl: u32,
    upload_addr: u32,
    vram: Vec<u32>,
    palette: [u8; PALETTE_ENTRIES],
}

impl Vga {
    /// Creates a disabled VGA device with a black palette and cleared VRAM.
    pub fn new(base_addr: u32) -> Self {
        Self {
            base_addr,
            ctrl: 0,
            upload_addr: 0,
            vram: vec![0; VRAM_WORDS],
            palette: [0; PALETTE_ENTRIES],
        }
    }

    /// Returns whether output is enabled and not blanked.
    pub fn is_displaying(&self) -> bool {
        self.ctrl & CTRL_ENABLE != 0 && self.ctrl & CTRL_BLANK == 0
    }

    /// Returns the palette index stored for the VRAM pixel at `(x, y)`.
    ///
    /// Coordinates outside the native resolution return index 0.
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        if x >= VRAM_WIDTH || y >= VRAM_HEIGHT {
            return 0;
        }
        let pixel = y * VRAM_WIDTH + x;
        let word = self.vram[(pixel / 4) as usize];
        (word >> ((pixel % 4) * 8)) as u8
    }

    /// Returns the 6-bit `RRGGBB` colour shown at `(x, y)`, or 0 while disabled or blanked.
    pub fn color_at(&self, x: u32, y: u32) -> u8 {
        if !self.is_displaying() {
            return 0;
        }
        self.palette[usize::from(self.index_at(x, y))]
    }

    /// Returns the raw VRAM word at `index`, or 0 when out of range.
    pub fn vram_word(&self, index: usize) -> u32 {
        self.vram.get(index).copied().unwrap_or(0)
    }

    fn stream_write(&mut self, val: u32) {
        if let Some(word) = self.vram.get_mut(self.upload_addr as usize) {
            *word = val;
        }
        self.upload_addr = self.upload_addr.wrapping_add(1);
    }

    fn palette_slot(offset: u32) -> Option<usize> {
        (PALETTE_OFFSET..PALETTE_END)
            .contains(&offset)
            .then(|| ((offset - PALETTE_OFFSET) / 4) as usize)
    }
}

impl Device for Vga {
    fn name(&self) -> &str {
        "VGA"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, PALETTE_END)
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        match offset {
            CTRL_OFFSET => self.ctrl,
            UPLOAD_ADDR_OFFSET => self.upload_addr,
            o => Self::palette_slot(o).map_or(0, |i| u32::from(self.palette[i])),
        }
    }

    fn write_u32(&mut self, offset: u32, val: u32) {
        match offset {
            CTRL_OFFSET => self.ctrl = val & (CTRL_ENABLE | CTRL_BLANK),
            UPLOAD_ADDR_OFFSET => self.upload_addr = val,
            STREAM_DATA_OFFSET => self.stream_write(val),
            o => {
                if let Some(i) = Self::palette_slot(o) {
                    self.palette[i] = (val & 0x3F) as u8;
                }
            }
        }
    }

    fn as_vga(&self) -> Option<&Vga> {
        Some(self)
    }
}
