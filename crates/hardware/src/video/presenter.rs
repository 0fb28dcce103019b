//! Frame presenters.
//!
//! A presenter receives every completed frame. It is polled once per frame and
//! never blocks the sequencer; it may ask the run to stop, which the harness
//! treats as a display quit request.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::common::error::{HarnessError, Result};
use crate::video::pixel_sink::Frame;

/// What the harness should do after a frame was presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentAction {
    /// Keep simulating.
    Continue,
    /// Stop the run (window closed, frame quota reached).
    Quit,
}

/// Destination for completed frames.
pub trait FramePresenter {
    /// Presents `frame` and reports whether the run should continue.
    fn present(&mut self, frame: &Frame) -> PresentAction;

    /// Number of frames presented so far.
    fn presented(&self) -> u64;
}

/// Saves a frame as an 8-bit RGBA PNG.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created, or
/// [`HarnessError::FrameCapture`] if encoding fails.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| HarnessError::io(path, e))?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, frame.width(), frame.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let capture_err = |source| HarnessError::FrameCapture {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = encoder.write_header().map_err(capture_err)?;
    writer.write_image_data(frame.as_rgba()).map_err(capture_err)
}

/// Counts frames without storing them.
#[derive(Debug, Default)]
pub struct FrameCounter {
    count: u64,
    limit: Option<u64>,
}

impl FrameCounter {
    /// Creates a counter that asks to quit after `limit` frames, if set.
    pub fn new(limit: Option<u64>) -> Self {
        Self { count: 0, limit }
    }
}

impl FramePresenter for FrameCounter {
    fn present(&mut self, _frame: &Frame) -> PresentAction {
        self.count += 1;
        quota_action(self.count, self.limit)
    }

    fn presented(&self) -> u64 {
        self.count
    }
}

/// Writes every presented frame to `dir/NNNNNN.png`, numbered from 1.
///
/// Write failures after startup are logged once and capture stops; the run
/// itself continues.
#[derive(Debug)]
pub struct PngCapture {
    dir: PathBuf,
    count: u64,
    limit: Option<u64>,
    failed: bool,
}

impl PngCapture {
    /// Creates the output directory and returns a capture presenter.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn create(dir: &Path, limit: Option<u64>) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            count: 0,
            limit,
            failed: false,
        })
    }

    /// Path of the `n`th frame (1-based).
    pub fn frame_path(&self, n: u64) -> PathBuf {
        self.dir.join(format!("{n:06}.png"))
    }
}

impl FramePresenter for PngCapture {
    fn present(&mut self, frame: &Frame) -> PresentAction {
        self.count += 1;
        if !self.failed {
            let path = self.frame_path(self.count);
            match save_frame(frame, &path) {
                Ok(()) => tracing::debug!(path = %path.display(), "frame captured"),
                Err(e) => {
                    tracing::warn!(error = %e, "frame capture failed; capture disabled");
                    self.failed = true;
                }
            }
        }
        quota_action(self.count, self.limit)
    }

    fn presented(&self) -> u64 {
        self.count
    }
}

fn quota_action(count: u64, limit: Option<u64>) -> PresentAction {
    match limit {
        Some(max) if count >= max => PresentAction::Quit,
        _ => PresentAction::Continue,
    }
}
