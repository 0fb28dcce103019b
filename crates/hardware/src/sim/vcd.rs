//! Value Change Dump waveform writer.
//!
//! Records the core model's pins after every evaluation. The header carries no
//! date or host information, so two identical runs produce byte-identical files.
//! The first dump lists every probe under `$dumpvars`; later dumps list only the
//! probes whose value changed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::common::error::{HarnessError, Result};
use crate::core::{CoreInputs, CoreOutputs};
use crate::soc::memory::ByteLanes;

/// A traced signal.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    /// Signal name in the waveform.
    pub name: &'static str,
    /// Width in bits.
    pub width: u8,
}

/// Signals recorded on every dump, in identifier order.
pub const PROBES: [Probe; 11] = [
    Probe { name: "clk", width: 1 },
    Probe { name: "reset", width: 1 },
    Probe { name: "interrupt", width: 1 },
    Probe { name: "instruction_address", width: 32 },
    Probe { name: "instruction", width: 32 },
    Probe { name: "address", width: 32 },
    Probe { name: "device_select", width: 3 },
    Probe { name: "write_enable", width: 1 },
    Probe { name: "write_strobe", width: 4 },
    Probe { name: "write_data", width: 32 },
    Probe { name: "read_data", width: 32 },
];

/// Probe values for one dump.
pub type Sample = [u32; PROBES.len()];

/// Collects the probe values from one evaluation's pins.
pub fn sample(inputs: &CoreInputs, outputs: &CoreOutputs) -> Sample {
    [
        u32::from(inputs.clock.is_high()),
        u32::from(inputs.reset),
        u32::from(inputs.interrupt),
        outputs.instruction_address,
        inputs.instruction,
        outputs.address,
        u32::from(outputs.device_select),
        u32::from(outputs.write_enable),
        u32::from(ByteLanes::from_strobes(outputs.write_strobe).bits()),
        outputs.write_data,
        inputs.read_data,
    ]
}

/// Short identifier code for probe `index`.
fn ident(index: usize) -> char {
    char::from(b'!' + index as u8)
}

/// Streaming VCD writer.
#[derive(Debug)]
pub struct VcdWriter<W: Write> {
    out: W,
    last: Option<Sample>,
}

impl VcdWriter<BufWriter<File>> {
    /// Creates `path` and writes the VCD header.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::TraceOpen`] if the file cannot be created or the
    /// header cannot be written.
    pub fn create(path: &Path) -> Result<Self> {
        let open_err = |source| HarnessError::TraceOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(open_err)?;
        let writer = Self::new(BufWriter::new(file)).map_err(open_err)?;
        tracing::info!(path = %path.display(), "waveform trace opened");
        Ok(writer)
    }
}

impl<W: Write> VcdWriter<W> {
    /// Wraps `out` and writes the header.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "$version cosim $end")?;
        writeln!(out, "$timescale 1ns $end")?;
        writeln!(out, "$scope module top $end")?;
        for (i, probe) in PROBES.iter().enumerate() {
            writeln!(
                out,
                "$var wire {} {} {} $end",
                probe.width,
                ident(i),
                probe.name
            )?;
        }
        writeln!(out, "$upscope $end")?;
        writeln!(out, "$enddefinitions $end")?;
        Ok(Self { out, last: None })
    }

    fn write_value(&mut self, index: usize, value: u32) -> io::Result<()> {
        if PROBES[index].width == 1 {
            writeln!(self.out, "{}{}", value & 1, ident(index))
        } else {
            writeln!(self.out, "b{value:b} {}", ident(index))
        }
    }

    /// Appends the values at `time`.
    ///
    /// # Errors
    ///
    /// Propagates write errors from the underlying writer.
    pub fn dump(&mut self, time: u64, values: &Sample) -> io::Result<()> {
        writeln!(self.out, "#{time}")?;
        match self.last {
            None => {
                writeln!(self.out, "$dumpvars")?;
                for (i, &v) in values.iter().enumerate() {
                    self.write_value(i, v)?;
                }
                writeln!(self.out, "$end")?;
            }
            Some(prev) => {
                for (i, (&v, &p)) in values.iter().zip(prev.iter()).enumerate() {
                    if v != p {
                        self.write_value(i, v)?;
                    }
                }
            }
        }
        self.last = Some(*values);
        Ok(())
    }

    /// Flushes buffered output and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Propagates flush errors.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
