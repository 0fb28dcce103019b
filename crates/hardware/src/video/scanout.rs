//! VGA beam generator.
//!
//! Walks a raster of `width + H_BLANK` by `height + V_BLANK` positions, one per
//! call, and reports the video pins a display controller would drive at each:
//! the palette colour of the VRAM pixel under the beam (scaled from the native
//! 320x200 to the sink resolution), the active-area flag, and vertical sync for
//! `VSYNC_LINES` lines starting `VSYNC_FRONT_PORCH` lines below the visible area.
//! At 640x480 this is the standard 800x525 frame.

use crate::core::VideoPins;
use crate::soc::devices::Vga;
use crate::soc::devices::vga::{VRAM_HEIGHT, VRAM_WIDTH};

/// Horizontal blanking width in pixel clocks.
pub const H_BLANK: u32 = 160;
/// Vertical blanking height in lines.
pub const V_BLANK: u32 = 45;
/// Lines between the end of the visible area and the start of vsync.
pub const VSYNC_FRONT_PORCH: u32 = 10;
/// Vsync pulse length in lines.
pub const VSYNC_LINES: u32 = 2;

/// Beam position over a `width` x `height` visible area.
#[derive(Clone, Debug)]
pub struct Scanout {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
}

impl Scanout {
    /// Creates a beam at the top-left of a `width` x `height` visible area.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    /// Pixel clocks per line.
    pub const fn h_total(&self) -> u32 {
        self.width + H_BLANK
    }

    /// Lines per frame.
    pub const fn v_total(&self) -> u32 {
        self.height + V_BLANK
    }

    /// Current beam position.
    pub const fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    fn in_vsync(&self) -> bool {
        let start = self.height + VSYNC_FRONT_PORCH;
        (start..start + VSYNC_LINES).contains(&self.y)
    }

    /// Returns the pins for the current beam position without moving the beam.
    pub fn pins(&self, vga: Option<&Vga>) -> VideoPins {
        let active = self.x < self.width && self.y < self.height;
        let rrggbb = match vga {
            Some(vga) if active => {
                let src_x = self.x * VRAM_WIDTH / self.width.max(1);
                let src_y = self.y * VRAM_HEIGHT / self.height.max(1);
                vga.color_at(src_x, src_y)
            }
            _ => 0,
        };
        VideoPins {
            rrggbb,
            active,
            x: u16::try_from(self.x).unwrap_or(u16::MAX),
            y: u16::try_from(self.y).unwrap_or(u16::MAX),
            vsync: self.in_vsync(),
        }
    }

    /// Moves the beam one pixel clock forward, wrapping at line and frame ends.
    pub fn advance(&mut self) {
        self.x += 1;
        if self.x >= self.h_total() {
            self.x = 0;
            self.y += 1;
            if self.y >= self.v_total() {
                self.y = 0;
            }
        }
    }
}
