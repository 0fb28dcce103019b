//! Boot image and ELF symbol loading.
//!
//! This module prepares memory before the first cycle. It performs:
//! 1. **Binary loading:** Reads a raw boot image from disk into a byte buffer.
//! 2. **Boot placement:** Copies the image into flat memory at the load offset,
//!    rejecting images that would run past the end of memory.
//! 3. **Compliance symbols:** Resolves `begin_signature` / `end_signature` from a
//!    compliance test ELF to fill the signature window.

use std::fs;
use std::path::Path;

use object::{Object, ObjectSymbol};

use crate::common::error::{HarnessError, Result};
use crate::soc::memory::FlatMemory;

/// Symbol marking the first byte of a compliance test signature.
pub const BEGIN_SIGNATURE: &str = "begin_signature";

/// Symbol marking the end (exclusive) of a compliance test signature.
pub const END_SIGNATURE: &str = "end_signature";

/// Loads a binary file from disk into a byte vector.
///
/// # Arguments
///
/// * `path` - Path to the binary file.
///
/// # Returns
///
/// The raw bytes of the file.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if the file cannot be read.
pub fn load_binary(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| HarnessError::io(path, e))
}

/// Loads a raw boot image into `memory` at `offset`.
///
/// # Arguments
///
/// * `memory` - Flat memory to fill.
/// * `path` - Path to the raw binary.
/// * `offset` - Byte address of the first image byte.
///
/// # Returns
///
/// The image size in bytes.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if the file cannot be read, or
/// [`HarnessError::BootImageTooLarge`] if it does not fit above `offset`.
pub fn load_boot_image(memory: &mut FlatMemory, path: &Path, offset: u32) -> Result<usize> {
    let image = load_binary(path)?;
    if !memory.fits(image.len(), offset) {
        return Err(HarnessError::BootImageTooLarge {
            path: path.to_path_buf(),
            size: image.len(),
            available: memory.available_from(offset),
        });
    }
    memory.load_image(&image, offset);
    tracing::info!(
        path = %path.display(),
        bytes = image.len(),
        offset = format_args!("{offset:#x}"),
        "boot image loaded"
    );
    Ok(image.len())
}

/// Resolves the signature window bounds from a compliance test ELF.
///
/// # Returns
///
/// `(begin, end)` byte addresses.
///
/// # Errors
///
/// Returns [`HarnessError::Elf`] if the file is not a parseable object,
/// [`HarnessError::MissingSymbol`] if either symbol is absent, or
/// [`HarnessError::InvalidNumber`] if a symbol lies above 4 GiB.
pub fn resolve_signature_symbols(path: &Path) -> Result<(u32, u32)> {
    let data = load_binary(path)?;
    let file = object::File::parse(&*data).map_err(|source| HarnessError::Elf {
        path: path.to_path_buf(),
        source,
    })?;

    let lookup = |symbol: &'static str| -> Result<u32> {
        let address = file
            .symbols()
            .find(|s| s.name().is_ok_and(|n| n == symbol))
            .map(|s| s.address())
            .ok_or_else(|| HarnessError::MissingSymbol {
                symbol,
                path: path.to_path_buf(),
            })?;
        u32::try_from(address).map_err(|_| HarnessError::InvalidNumber(format!("{address:#x}")))
    };

    let begin = lookup(BEGIN_SIGNATURE)?;
    let end = lookup(END_SIGNATURE)?;
    tracing::info!(
        path = %path.display(),
        begin = format_args!("{begin:#x}"),
        end = format_args!("{end:#x}"),
        "signature symbols resolved"
    );
    Ok((begin, end))
}
