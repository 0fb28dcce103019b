//! Harness error taxonomy.
//!
//! Every variant here is a fatal configuration error: it is reported before the
//! first simulated cycle and aborts the run. Runtime anomalies (stray addresses,
//! out-of-bounds pixels, unmapped selectors) are never errors; the bus and
//! devices absorb them as no-ops. Simulation-completion signals are modelled by
//! [`HaltReason`](crate::sim::simulator::HaltReason), not by this type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or starting a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A file could not be read or created.
    #[error("could not access '{path}': {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The boot image does not fit between the load offset and the end of memory.
    #[error(
        "boot image '{path}' is too large (file is {size} bytes, memory has {available} bytes after the load offset)"
    )]
    BootImageTooLarge {
        /// Boot image path.
        path: PathBuf,
        /// Image size in bytes.
        size: usize,
        /// Bytes available from the load offset to the end of memory.
        available: usize,
    },

    /// The waveform trace destination could not be opened.
    #[error("failed to open waveform trace '{path}': {source}")]
    TraceOpen {
        /// Trace output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The signature destination could not be opened.
    #[error("failed to open signature file '{path}': {source}")]
    SignatureOpen {
        /// Signature output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A signature window with `end < begin`.
    #[error("invalid signature window [{begin:#x}, {end:#x})")]
    InvalidSignatureWindow {
        /// Window start address.
        begin: u32,
        /// Window end address (exclusive).
        end: u32,
    },

    /// A numeric argument could not be parsed as decimal or `0x` hex.
    #[error("malformed numeric argument '{0}'")]
    InvalidNumber(String),

    /// A JSON run configuration or stimulus file was malformed.
    #[error("malformed JSON in '{path}': {source}")]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An ELF file could not be parsed.
    #[error("could not parse ELF '{path}': {source}")]
    Elf {
        /// ELF path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: object::Error,
    },

    /// A required symbol is missing from the ELF symbol table.
    #[error("symbol '{symbol}' not found in '{path}'")]
    MissingSymbol {
        /// Symbol name that was looked up.
        symbol: &'static str,
        /// ELF path.
        path: PathBuf,
    },

    /// Writing the frame capture image failed.
    #[error("failed to write frame '{path}': {source}")]
    FrameCapture {
        /// Frame image path.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: png::EncodingError,
    },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
