//! Processor core model port.
//!
//! The processor under test is an external, clock-stepped black box. This module
//! defines the adapter boundary the harness drives it through:
//! 1. **Input pins:** clock, reset, instruction word, read data, interrupt line.
//! 2. **Output pins:** fetch address, data-port bundle, optional video signals.
//! 3. **Evaluation:** one combinational settle of the model for the current inputs.
//!
//! A Verilated RTL wrapper, a software instruction-set simulator, or the bundled
//! [`ReplayCore`] can all sit behind [`CoreModel`] without the bus or devices knowing.

/// Stimulus-driven core model.
pub mod replay;

pub use replay::{ReplayCore, StimulusOp};

use crate::common::signal::Level;
use crate::soc::interconnect::BusTransaction;
use crate::soc::memory::ByteLanes;

/// Input pins driven by the harness before every evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreInputs {
    /// Clock.
    pub clock: Level,
    /// Synchronous reset, active high.
    pub reset: bool,
    /// Instruction-valid strobe; held high by the harness.
    pub instruction_valid: bool,
    /// Instruction word fetched for the previous fetch address.
    pub instruction: u32,
    /// Data word read for the previous data address.
    pub read_data: u32,
    /// Interrupt request line.
    pub interrupt: bool,
    /// Pixel clock; follows the system clock.
    pub pixel_clock: Level,
}

/// Video signals a core model with an on-chip display controller can expose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoPins {
    /// 6-bit `RRGGBB` colour of the current pixel.
    pub rrggbb: u8,
    /// Beam is inside the visible area.
    pub active: bool,
    /// Horizontal beam position.
    pub x: u16,
    /// Vertical beam position.
    pub y: u16,
    /// Vertical sync asserted.
    pub vsync: bool,
}

/// Output pins sampled by the harness after every evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreOutputs {
    /// Instruction fetch address.
    pub instruction_address: u32,
    /// Data-port address.
    pub address: u32,
    /// Data-port device select.
    pub device_select: u8,
    /// Data-port write enable.
    pub write_enable: bool,
    /// Data-port byte write strobes.
    pub write_strobe: [bool; 4],
    /// Data-port write data.
    pub write_data: u32,
    /// Video pins, when the model drives a display itself.
    pub video: Option<VideoPins>,
}

impl CoreOutputs {
    /// Packs the data-port pins into a bus transaction.
    pub fn transaction(&self) -> BusTransaction {
        BusTransaction {
            address: self.address,
            device_select: self.device_select,
            write_enable: self.write_enable,
            lanes: ByteLanes::from_strobes(self.write_strobe),
            write_data: self.write_data,
        }
    }
}

/// A clock-stepped processor core model.
pub trait CoreModel {
    /// Settles the model for `inputs` and returns the resulting output pins.
    fn evaluate(&mut self, inputs: &CoreInputs) -> CoreOutputs;

    /// Returns `true` once the model's own completion signal has fired
    /// (for example an RTL `$finish` or an assertion failure).
    fn finished(&self) -> bool {
        false
    }

    /// Called once after the run ends so the model can flush its own state.
    fn finalize(&mut self) {}
}

impl<M: CoreModel + ?Sized> CoreModel for Box<M> {
    fn evaluate(&mut self, inputs: &CoreInputs) -> CoreOutputs {
        (**self).evaluate(inputs)
    }

    fn finished(&self) -> bool {
        (**self).finished()
    }

    fn finalize(&mut self) {
        (**self).finalize();
    }
}
