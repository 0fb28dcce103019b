//! Stimulus replay core.
//!
//! [`ReplayCore`] stands in for RTL when none is linked: it drives the data port
//! from a scripted list of bus operations. One operation is presented per clock
//! cycle. An operation is held on the pins from the falling edge that selects it
//! through the next rising edge (where the bus latches it), and is retired on the
//! falling edge after that. Reset holds the script at its first operation.
//!
//! Stimulus files are JSON:
//!
//! ```json
//! {
//!   "entry": "0x1000",
//!   "ops": [
//!     { "op": "write", "address": "0x40000010", "data": 72 },
//!     { "op": "idle", "cycles": 4 },
//!     { "op": "read", "address": "0x00008000" },
//!     { "op": "finish" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{CoreInputs, CoreModel, CoreOutputs};
use crate::common::addr::BusAddr;
use crate::common::error::{HarnessError, Result};
use crate::common::signal::{Edge, Level, transition};
use crate::config::{de_u32, de_u64};

const fn all_lanes() -> u8 {
    0xF
}

const fn default_entry() -> u32 {
    crate::common::constants::DEFAULT_ENTRY
}

/// One scripted bus cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum StimulusOp {
    /// Write `data` to `address` through the byte lanes in `lanes` (bit 0 = byte 0).
    Write {
        /// Raw bus address; the selector comes from its top bits.
        #[serde(deserialize_with = "de_u32")]
        address: u32,
        /// Write data.
        #[serde(deserialize_with = "de_u32")]
        data: u32,
        /// Byte-lane mask.
        #[serde(default = "all_lanes")]
        lanes: u8,
    },
    /// Drive `address` for one cycle and record the value read back.
    Read {
        /// Raw bus address.
        #[serde(deserialize_with = "de_u32")]
        address: u32,
    },
    /// Leave the data port idle for `cycles` cycles.
    Idle {
        /// Cycle count; zero behaves as one.
        #[serde(deserialize_with = "de_u64")]
        cycles: u64,
    },
    /// Raise the completion signal.
    Finish,
}

impl StimulusOp {
    fn cycles(&self) -> u64 {
        match self {
            Self::Idle { cycles } => (*cycles).max(1),
            _ => 1,
        }
    }
}

/// Parsed stimulus file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Stimulus {
    #[serde(default = "default_entry", deserialize_with = "de_u32")]
    entry: u32,
    ops: Vec<StimulusOp>,
}

/// Value observed by a [`StimulusOp::Read`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadRecord {
    /// Address that was driven.
    pub address: u32,
    /// Data presented on the read port at the end of the cycle.
    pub data: u32,
}

/// Core model that replays a list of bus operations.
#[derive(Debug, Clone)]
pub struct ReplayCore {
    entry: u32,
    ops: Vec<StimulusOp>,
    index: usize,
    edges_in_op: u64,
    retire_pending: bool,
    prev_clock: Level,
    finished: bool,
    reads: Vec<ReadRecord>,
}

impl ReplayCore {
    /// Creates a replay core whose fetch address starts at `entry`.
    pub fn new(entry: u32, ops: Vec<StimulusOp>) -> Self {
        Self {
            entry,
            ops,
            index: 0,
            edges_in_op: 0,
            retire_pending: false,
            prev_clock: Level::Low,
            finished: false,
            reads: Vec::new(),
        }
    }

    /// Loads a stimulus script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or [`HarnessError::Json`]
    /// if the script is malformed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        let stimulus: Stimulus =
            serde_json::from_str(&text).map_err(|source| HarnessError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(
            path = %path.display(),
            ops = stimulus.ops.len(),
            "stimulus loaded"
        );
        Ok(Self::new(stimulus.entry, stimulus.ops))
    }

    /// Values recorded by read operations, in script order.
    pub fn reads(&self) -> &[ReadRecord] {
        &self.reads
    }

    /// Index of the operation currently on the pins.
    pub fn position(&self) -> usize {
        self.index
    }

    fn current(&self) -> Option<&StimulusOp> {
        self.ops.get(self.index)
    }

    fn retire(&mut self, read_data: u32) {
        if let Some(StimulusOp::Read { address }) = self.current() {
            let record = ReadRecord {
                address: *address,
                data: read_data,
            };
            tracing::debug!(
                address = format_args!("{:#010x}", record.address),
                data = format_args!("{:#010x}", record.data),
                "stimulus read"
            );
            self.reads.push(record);
        }
        self.index += 1;
        self.edges_in_op = 0;
        self.retire_pending = false;
    }

    fn outputs(&self) -> CoreOutputs {
        let instruction_address = self
            .entry
            .wrapping_add(u32::try_from(self.index).unwrap_or(u32::MAX).wrapping_mul(4));
        let mut out = CoreOutputs {
            instruction_address,
            ..CoreOutputs::default()
        };
        match self.current() {
            Some(&StimulusOp::Write {
                address,
                data,
                lanes,
            }) => {
                out.address = address;
                out.device_select = BusAddr::from_raw(address).selector;
                out.write_enable = true;
                out.write_strobe = std::array::from_fn(|i| lanes & (1 << i) != 0);
                out.write_data = data;
            }
            Some(&StimulusOp::Read { address }) => {
                out.address = address;
                out.device_select = BusAddr::from_raw(address).selector;
            }
            _ => {}
        }
        out
    }
}

impl CoreModel for ReplayCore {
    fn evaluate(&mut self, inputs: &CoreInputs) -> CoreOutputs {
        let edge = transition(self.prev_clock, inputs.clock);
        self.prev_clock = inputs.clock;

        if inputs.reset {
            self.index = 0;
            self.edges_in_op = 0;
            self.retire_pending = false;
            return CoreOutputs {
                instruction_address: self.entry,
                ..CoreOutputs::default()
            };
        }

        match edge {
            Edge::Falling if self.retire_pending => self.retire(inputs.read_data),
            Edge::Rising => {
                if let Some(cycles) = self.current().map(StimulusOp::cycles) {
                    self.edges_in_op += 1;
                    self.retire_pending = self.edges_in_op >= cycles;
                }
            }
            _ => {}
        }

        if matches!(self.current(), Some(StimulusOp::Finish)) && !self.finished {
            tracing::info!(op = self.index, "stimulus finished");
            self.finished = true;
        }

        self.outputs()
    }

    fn finished(&self) -> bool {
        self.finished
    }
}
