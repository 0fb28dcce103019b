//! Configuration system for the co-simulation harness.
//!
//! This module defines the run configuration. It provides:
//! 1. **Defaults:** Baseline constants (cycle budget, memory size, load offset, display size).
//! 2. **Structures:** Hierarchical config for the run, memory, trace outputs and display.
//! 3. **Numbers:** Decimal or `0x`-prefixed hex parsing shared by JSON and the CLI.
//!
//! Configuration is read from JSON (`Config::from_json_file`) or built from
//! `Config::default()` and overridden field by field by the CLI. It is immutable
//! once the simulator is constructed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::common::error::{HarnessError, Result};

/// Default configuration constants for the harness.
mod defaults {
    /// Cycle budget; small enough for a smoke test.
    pub const MAX_CYCLES: u64 = 10_000;

    /// Memory capacity in 32-bit words (16M words = 64 MiB).
    pub const MEMORY_WORDS: usize = 16 * 1024 * 1024;

    /// Address at which the boot image is loaded.
    pub const LOAD_OFFSET: u32 = crate::common::constants::DEFAULT_ENTRY;

    /// Half-period threshold: the clock toggles once the per-iteration counter exceeds it.
    pub const CLOCK_HALF_PERIOD: u32 = 1;

    /// Pixel sink width (VGA 640x480).
    pub const DISPLAY_WIDTH: u32 = 640;

    /// Pixel sink height.
    pub const DISPLAY_HEIGHT: u32 = 480;
}

/// Parses a decimal or `0x`/`0X`-prefixed hexadecimal number.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidNumber`] when the text is not a valid number.
pub fn parse_number_u64(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse(),
    };
    parsed.map_err(|_| HarnessError::InvalidNumber(text.to_string()))
}

/// Parses a 32-bit decimal or hexadecimal number; see [`parse_number_u64`].
pub fn parse_number(text: &str) -> Result<u32> {
    let wide = parse_number_u64(text)?;
    u32::try_from(wide).map_err(|_| HarnessError::InvalidNumber(text.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(u64),
    Text(String),
}

impl NumberRepr {
    fn into_u64(self) -> Result<u64> {
        match self {
            Self::Int(v) => Ok(v),
            Self::Text(s) => parse_number_u64(&s),
        }
    }
}

/// Deserializes a `u32` from a JSON integer or a number string such as `"0x8000"`.
pub(crate) fn de_u32<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    let wide = NumberRepr::deserialize(d)?
        .into_u64()
        .map_err(D::Error::custom)?;
    u32::try_from(wide).map_err(D::Error::custom)
}

/// Deserializes a `u64` from a JSON integer or a number string.
pub(crate) fn de_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    NumberRepr::deserialize(d)?
        .into_u64()
        .map_err(D::Error::custom)
}

/// Deserializes an optional `u32` from a JSON integer, number string, or `null`.
pub(crate) fn de_opt_u32<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<u32>, D::Error> {
    Option::<NumberRepr>::deserialize(d)?
        .map(|n| {
            let wide = n.into_u64().map_err(D::Error::custom)?;
            u32::try_from(wide).map_err(D::Error::custom)
        })
        .transpose()
}

/// Root configuration structure for one harness run.
///
/// # Examples
///
/// ```
/// use cosim_core::config::Config;
///
/// let json = r#"{
///     "general": { "max_cycles": 500000, "halt_address": "0x0ffc" },
///     "memory": { "words": 65536, "boot_image": "test.bin" },
///     "trace": {
///         "signature": { "begin": "0x8000", "end": "0x8010", "path": "test.sig" }
///     }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.general.max_cycles, 500_000);
/// assert_eq!(config.general.halt_address, Some(0x0ffc));
/// assert_eq!(config.memory.load_offset, 0x1000);
/// assert!(!config.display.enabled);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Cycle budget, clocking and halt detection.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory capacity and boot image.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Waveform and signature outputs.
    #[serde(default)]
    pub trace: TraceConfig,
    /// Pixel sink and frame presentation.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or [`HarnessError::Json`]
    /// if it is not a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| HarnessError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidSignatureWindow`] when the window ends before it begins.
    pub fn validate(&self) -> Result<()> {
        if let Some(sig) = &self.trace.signature {
            if sig.end < sig.begin {
                return Err(HarnessError::InvalidSignatureWindow {
                    begin: sig.begin,
                    end: sig.end,
                });
            }
        }
        Ok(())
    }
}

/// General run settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Maximum number of simulated cycles before normal termination.
    #[serde(default = "GeneralConfig::default_max_cycles", deserialize_with = "de_u64")]
    pub max_cycles: u64,

    /// Address polled for the halt sentinel after every cycle; `None` disables polling.
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub halt_address: Option<u32>,

    /// Clock half-period threshold in iterations.
    #[serde(default = "GeneralConfig::default_half_period", deserialize_with = "de_u32")]
    pub clock_half_period: u32,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }

    fn default_half_period() -> u32 {
        defaults::CLOCK_HALF_PERIOD
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
            halt_address: None,
            clock_half_period: defaults::CLOCK_HALF_PERIOD,
        }
    }
}

/// Memory capacity and boot image placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Capacity in 32-bit words.
    #[serde(default = "MemoryConfig::default_words")]
    pub words: usize,

    /// Raw binary loaded into memory before the first cycle.
    #[serde(default)]
    pub boot_image: Option<PathBuf>,

    /// Byte address the boot image is loaded at.
    #[serde(default = "MemoryConfig::default_load_offset", deserialize_with = "de_u32")]
    pub load_offset: u32,
}

impl MemoryConfig {
    fn default_words() -> usize {
        defaults::MEMORY_WORDS
    }

    fn default_load_offset() -> u32 {
        defaults::LOAD_OFFSET
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            words: defaults::MEMORY_WORDS,
            boot_image: None,
            load_offset: defaults::LOAD_OFFSET,
        }
    }
}

/// Memory region dumped after the run for compliance checking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureWindow {
    /// First byte address (inclusive).
    #[serde(deserialize_with = "de_u32")]
    pub begin: u32,
    /// Last byte address (exclusive).
    #[serde(deserialize_with = "de_u32")]
    pub end: u32,
    /// Output file.
    pub path: PathBuf,
}

/// Observation outputs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// VCD waveform output path.
    #[serde(default)]
    pub vcd: Option<PathBuf>,

    /// Signature window and output path.
    #[serde(default)]
    pub signature: Option<SignatureWindow>,
}

/// Pixel sink and presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Enables the pixel sink.
    #[serde(default)]
    pub enabled: bool,

    /// Frame buffer width in pixels.
    #[serde(default = "DisplayConfig::default_width")]
    pub width: u32,

    /// Frame buffer height in pixels.
    #[serde(default = "DisplayConfig::default_height")]
    pub height: u32,

    /// Directory presented frames are saved to as PNG; when unset frames are only counted.
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,

    /// Stop the run after this many presented frames.
    #[serde(default)]
    pub max_frames: Option<u64>,
}

impl DisplayConfig {
    fn default_width() -> u32 {
        defaults::DISPLAY_WIDTH
    }

    fn default_height() -> u32 {
        defaults::DISPLAY_HEIGHT
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: defaults::DISPLAY_WIDTH,
            height: defaults::DISPLAY_HEIGHT,
            frames_dir: None,
            max_frames: None,
        }
    }
}
