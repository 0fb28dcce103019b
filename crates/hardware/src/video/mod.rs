//! Display pipeline.
//!
//! This module turns pixel-level video signals into presented frames. It provides:
//! 1. **Pixel Sink:** An RGBA frame buffer written by pixel events and completed on vsync.
//! 2. **Scanout:** A beam generator that produces pixel events from the VGA register file
//!    when the core model does not drive video pins itself.
//! 3. **Presenters:** Where completed frames go (PNG capture or a plain counter).

/// RGBA frame buffer and vsync-driven frame completion.
pub mod pixel_sink;

/// Frame presentation back ends.
pub mod presenter;

/// Beam generator over the VGA register file.
pub mod scanout;

pub use pixel_sink::{Frame, PixelSink, expand_rrggbb};
pub use presenter::{FrameCounter, FramePresenter, PngCapture, PresentAction};
pub use scanout::Scanout;
