//! Compliance signature extraction.
//!
//! After the run halts, every word in `[begin, end)` is written as one line of
//! eight lower-case hex digits, in ascending address order. The destination is
//! opened before the first cycle so a bad path fails fast.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::common::error::{HarnessError, Result};
use crate::config::SignatureWindow;
use crate::soc::memory::FlatMemory;

/// Writes the words of `memory` in `[begin, end)` to `out`.
///
/// # Returns
///
/// The number of lines written.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn write_signature<W: Write>(
    out: &mut W,
    memory: &FlatMemory,
    begin: u32,
    end: u32,
) -> io::Result<usize> {
    let mut lines = 0;
    for word in memory.words_in(begin, end) {
        writeln!(out, "{word:08x}")?;
        lines += 1;
    }
    out.flush()?;
    Ok(lines)
}

/// Open signature destination bound to a window.
#[derive(Debug)]
pub struct SignatureSink {
    begin: u32,
    end: u32,
    path: PathBuf,
    out: BufWriter<File>,
}

impl SignatureSink {
    /// Validates `window` and creates its output file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidSignatureWindow`] if `end < begin`, or
    /// [`HarnessError::SignatureOpen`] if the file cannot be created.
    pub fn create(window: &SignatureWindow) -> Result<Self> {
        if window.end < window.begin {
            return Err(HarnessError::InvalidSignatureWindow {
                begin: window.begin,
                end: window.end,
            });
        }
        let file = File::create(&window.path).map_err(|source| HarnessError::SignatureOpen {
            path: window.path.clone(),
            source,
        })?;
        Ok(Self {
            begin: window.begin,
            end: window.end,
            path: window.path.clone(),
            out: BufWriter::new(file),
        })
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dumps the window from `memory` and closes the file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if writing fails.
    pub fn emit(mut self, memory: &FlatMemory) -> Result<usize> {
        let lines = write_signature(&mut self.out, memory, self.begin, self.end)
            .map_err(|e| HarnessError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), words = lines, "signature written");
        Ok(lines)
    }
}
