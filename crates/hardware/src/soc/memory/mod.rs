//! Flat System Memory.
//!
//! This module implements the main system memory. It provides:
//! 1. **Storage:** A fixed-capacity sequence of 32-bit words, allocated once per run.
//! 2. **Byte Lanes:** Byte-granular writes driven by the four bus write strobes.
//! 3. **Fetch Path:** A separate instruction read entry point that never touches devices.
//! 4. **Boot Loading:** Little-endian word loading of a raw boot image at a load offset.
//!
//! Every address is masked into [`MEMORY_WINDOW_MASK`] and divided by four before
//! indexing. Words past the configured capacity read as zero and ignore writes, so a
//! core model that issues stray or speculative addresses never aborts the run.

use crate::common::constants::{MEMORY_WINDOW_MASK, WORD_BYTES};

/// Set of byte lanes enabled for a write (bit `i` selects bits `8i..8i+7` of the word).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ByteLanes(u8);

impl ByteLanes {
    /// All four lanes.
    pub const ALL: Self = Self(0b1111);
    /// No lanes; a write with this mask changes nothing.
    pub const NONE: Self = Self(0);

    /// Creates a lane set from the low four bits of `bits`.
    #[inline]
    pub const fn new(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Creates a lane set from the four individual strobe pins.
    #[inline]
    pub fn from_strobes(strobes: [bool; 4]) -> Self {
        let bits = strobes
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &on)| acc | (u8::from(on) << i));
        Self(bits)
    }

    /// Returns the raw 4-bit lane mask.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Expands the lanes into a 32-bit word mask.
    #[inline]
    pub const fn word_mask(self) -> u32 {
        let mut mask = 0u32;
        let mut lane = 0;
        while lane < 4 {
            if self.0 & (1 << lane) != 0 {
                mask |= 0xFF << (lane * 8);
            }
            lane += 1;
        }
        mask
    }

    /// Returns the lanes not in `self`.
    #[inline]
    pub const fn complement(self) -> Self {
        Self(!self.0 & 0b1111)
    }
}

/// Word-addressable backing store shared by the fetch and data paths.
#[derive(Clone, Debug)]
pub struct FlatMemory {
    words: Vec<u32>,
}

impl FlatMemory {
    /// Allocates `capacity_words` zeroed words.
    pub fn new(capacity_words: usize) -> Self {
        Self {
            words: vec![0; capacity_words],
        }
    }

    /// Returns the capacity in words.
    pub fn capacity_words(&self) -> usize {
        self.words.len()
    }

    /// Returns the capacity in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.words.len() * WORD_BYTES
    }

    #[inline]
    fn index(address: u32) -> usize {
        ((address & MEMORY_WINDOW_MASK) as usize) / WORD_BYTES
    }

    /// Reads the word containing `address` on the data path.
    ///
    /// Returns zero when the word lies beyond the configured capacity.
    #[inline]
    pub fn read(&self, address: u32) -> u32 {
        self.words.get(Self::index(address)).copied().unwrap_or(0)
    }

    /// Reads the word containing `address` on the instruction fetch path.
    ///
    /// Uses the same addressing rule as [`read`](Self::read) but is never routed
    /// through the bus, so a fetch cannot trigger a device side effect.
    #[inline]
    pub fn read_instruction(&self, address: u32) -> u32 {
        self.words.get(Self::index(address)).copied().unwrap_or(0)
    }

    /// Writes the lanes of `value` selected by `lanes` into the word containing `address`.
    ///
    /// Unselected bytes of the stored word are preserved. Writes beyond capacity
    /// are dropped.
    #[inline]
    pub fn write(&mut self, address: u32, value: u32, lanes: ByteLanes) {
        if let Some(word) = self.words.get_mut(Self::index(address)) {
            let mask = lanes.word_mask();
            *word = (*word & !mask) | (value & mask);
        }
    }

    /// Copies `image` into memory as little-endian words starting at `offset`.
    ///
    /// A trailing partial word is kept and zero-padded rather than dropped, so an
    /// image whose length is not a multiple of four loads completely. The caller
    /// is responsible for the capacity check (see [`fits`](Self::fits)); bytes
    /// past the end are dropped.
    pub fn load_image(&mut self, image: &[u8], offset: u32) {
        let first = Self::index(offset);
        for (i, chunk) in image.chunks(WORD_BYTES).enumerate() {
            let mut bytes = [0u8; WORD_BYTES];
            bytes[..chunk.len()].copy_from_slice(chunk);
            if let Some(word) = self.words.get_mut(first + i) {
                *word = u32::from_le_bytes(bytes);
            }
        }
    }

    /// Returns how many bytes are available from `offset` to the end of memory.
    pub fn available_from(&self, offset: u32) -> usize {
        self.capacity_bytes().saturating_sub(offset as usize)
    }

    /// Returns `true` when an image of `len` bytes loaded at `offset` fits in memory.
    pub fn fits(&self, len: usize, offset: u32) -> bool {
        len <= self.available_from(offset)
    }

    /// Returns the words in `[begin, end)` in ascending address order.
    pub fn words_in(&self, begin: u32, end: u32) -> impl Iterator<Item = u32> + '_ {
        (begin..end).step_by(WORD_BYTES).map(|addr| self.read(addr))
    }
}
