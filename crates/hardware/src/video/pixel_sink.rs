//! Pixel sink.
//!
//! Consumes one set of video pins per evaluation. A pixel is stored only while
//! the beam is in the active area and inside the frame; everything else is
//! dropped silently. A falling edge on vertical sync completes the frame.
//!
//! The frame buffer is not cleared between frames: pixels the beam does not
//! revisit keep their previous colour.

use crate::common::signal::{Edge, EdgeDetector, Level};
use crate::core::VideoPins;

/// Bytes per RGBA pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Expands a 6-bit `RRGGBB` colour to opaque RGBA, scaling each 2-bit channel by 85.
///
/// # Examples
///
/// ```
/// use cosim_core::video::expand_rrggbb;
///
/// assert_eq!(expand_rrggbb(0b11_00_00), [255, 0, 0, 255]);
/// assert_eq!(expand_rrggbb(0b01_10_11), [85, 170, 255, 255]);
/// ```
#[inline]
pub const fn expand_rrggbb(color: u8) -> [u8; 4] {
    let r = (color >> 4) & 0b11;
    let g = (color >> 2) & 0b11;
    let b = color & 0b11;
    [r * 85, g * 85, b * 85, 0xFF]
}

/// Fixed-resolution RGBA raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Frame {
    /// Creates a black, opaque frame.
    pub fn new(width: u32, height: u32) -> Self {
        let mut rgba = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        for px in rgba.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[3] = 0xFF;
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Returns the RGBA value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let at = self.offset(x, y)?;
        let mut px = [0; BYTES_PER_PIXEL];
        px.copy_from_slice(&self.rgba[at..at + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Stores `rgba` at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(at) = self.offset(x, y) {
            self.rgba[at..at + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }
}

/// Frame buffer fed by pixel events.
#[derive(Clone, Debug)]
pub struct PixelSink {
    frame: Frame,
    vsync: EdgeDetector,
    frames_completed: u64,
}

impl PixelSink {
    /// Creates a sink with a `width` x `height` frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Frame::new(width, height),
            vsync: EdgeDetector::new(Level::Low),
            frames_completed: 0,
        }
    }

    /// Current frame contents.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of vsync falling edges seen so far.
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Applies one evaluation's video pins.
    ///
    /// The pixel is written first, then vsync is sampled.
    ///
    /// # Returns
    ///
    /// `true` when this sample is a vsync falling edge, i.e. a frame is complete
    /// and should be presented.
    pub fn feed(&mut self, pins: &VideoPins) -> bool {
        if pins.active {
            self.frame.put(
                u32::from(pins.x),
                u32::from(pins.y),
                expand_rrggbb(pins.rrggbb),
            );
        }
        let complete = self.vsync.sample(Level::from(pins.vsync)) == Edge::Falling;
        if complete {
            self.frames_completed += 1;
            tracing::debug!(frame = self.frames_completed, "frame complete");
        }
        complete
    }
}
