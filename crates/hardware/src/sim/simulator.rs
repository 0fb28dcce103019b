//! Clock sequencer.
//!
//! The simulator owns the core model and the system side by side and advances
//! them one iteration at a time. Each iteration:
//! 1. **Clock:** Increments the cycle counter and toggles the clock once the
//!    half-period counter exceeds its threshold; releases reset after the first
//!    two cycles.
//! 2. **Evaluate:** Presents the pending read data and instruction word, then
//!    settles the core model. The interrupt line is deasserted afterwards.
//! 3. **Bus:** Commits the model's write if this evaluation saw a rising edge,
//!    then recomputes the read and fetch words for the next evaluation.
//! 4. **Observe:** Records the waveform, feeds the pixel sink and checks the halt
//!    sentinel.
//!
//! Termination is checked at the top of every iteration (cycle budget, model
//! completion) and at the end of it (halt sentinel, display quit). Once halted
//! the simulator performs no further bus activity.

use std::fs::File;
use std::io::BufWriter;

use crate::common::constants::{HALT_SENTINEL, RESET_CYCLES};
use crate::common::error::Result;
use crate::common::signal::{Edge, Level};
use crate::config::Config;
use crate::core::{CoreInputs, CoreModel, CoreOutputs};
use crate::sim::signature::SignatureSink;
use crate::sim::vcd::{self, VcdWriter};
use crate::soc::System;
use crate::stats::SimStats;
use crate::video::{FrameCounter, FramePresenter, PixelSink, PngCapture, PresentAction, Scanout};

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// The cycle budget was exhausted.
    MaxCycles,
    /// The core model raised its own completion signal.
    ModelFinished,
    /// The guest wrote the halt sentinel to the halt-check address.
    HaltSentinel,
    /// The frame presenter asked to stop.
    DisplayClosed,
}

/// Sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Reset asserted.
    Reset,
    /// Reset released, clock running.
    Running,
    /// Terminal.
    Halted(HaltReason),
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Termination cause.
    pub reason: HaltReason,
    /// Cycle counter at termination.
    pub cycles: u64,
    /// Words written to the signature file; `None` if none was configured or writing it failed.
    pub signature_words: Option<usize>,
    /// Collected statistics.
    pub stats: SimStats,
}

struct Display {
    sink: PixelSink,
    scanout: Scanout,
    presenter: Box<dyn FramePresenter>,
}

/// Top-level simulator: core model + system + observers.
pub struct Simulator<C: CoreModel> {
    core: C,
    system: System,
    max_cycles: u64,
    halt_address: Option<u32>,
    half_period: u32,
    time: u64,
    half_counter: u32,
    clock: Level,
    inputs: CoreInputs,
    state: RunState,
    started: bool,
    trace: Option<VcdWriter<BufWriter<File>>>,
    signature: Option<SignatureSink>,
    display: Option<Display>,
    stats: SimStats,
}

impl<C: CoreModel> Simulator<C> {
    /// Creates a simulator and opens every configured output.
    ///
    /// # Arguments
    ///
    /// * `core` - The processor core model to drive.
    /// * `system` - Bus, memory and peripherals, already boot-loaded.
    /// * `config` - Run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature window is invalid or a trace, signature
    /// or frame destination cannot be opened. No cycle has run at that point.
    pub fn new(core: C, system: System, config: &Config) -> Result<Self> {
        config.validate()?;

        let trace = config
            .trace
            .vcd
            .as_deref()
            .map(VcdWriter::<BufWriter<File>>::create)
            .transpose()?;
        let signature = config
            .trace
            .signature
            .as_ref()
            .map(SignatureSink::create)
            .transpose()?;

        let display = if config.display.enabled {
            let presenter: Box<dyn FramePresenter> = match &config.display.frames_dir {
                Some(dir) => Box::new(PngCapture::create(dir, config.display.max_frames)?),
                None => Box::new(FrameCounter::new(config.display.max_frames)),
            };
            Some(Display {
                sink: PixelSink::new(config.display.width, config.display.height),
                scanout: Scanout::new(config.display.width, config.display.height),
                presenter,
            })
        } else {
            None
        };

        Ok(Self {
            core,
            system,
            max_cycles: config.general.max_cycles,
            halt_address: config.general.halt_address,
            half_period: config.general.clock_half_period,
            time: 0,
            half_counter: 0,
            clock: Level::Low,
            inputs: CoreInputs {
                reset: true,
                instruction_valid: true,
                ..CoreInputs::default()
            },
            state: RunState::Reset,
            started: false,
            trace,
            signature,
            display,
            stats: SimStats::default(),
        })
    }

    /// Replaces the frame presenter. Has no effect while the display is disabled.
    pub fn set_presenter(&mut self, presenter: Box<dyn FramePresenter>) {
        if let Some(display) = &mut self.display {
            display.presenter = presenter;
        }
    }

    /// Current sequencer state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Cycle counter.
    pub fn cycle(&self) -> u64 {
        self.time
    }

    /// The system behind the bus.
    pub fn system(&self) -> &System {
        &self.system
    }

    /// The system behind the bus, mutably (test pokes, late loading).
    pub fn system_mut(&mut self) -> &mut System {
        &mut self.system
    }

    /// The core model.
    pub fn core(&self) -> &C {
        &self.core
    }

    /// Current pixel sink, when the display is enabled.
    pub fn pixel_sink(&self) -> Option<&PixelSink> {
        self.display.as_ref().map(|d| &d.sink)
    }

    /// Evaluates the model, resolves the bus, and records the result.
    fn settle(&mut self) -> (Edge, CoreOutputs) {
        let presented = self.inputs;
        let outputs = self.core.evaluate(&presented);
        self.inputs.interrupt = false;

        let txn = outputs.transaction();
        let (edge, read) = self.system.bus.evaluate(self.clock, &txn);
        if edge == Edge::Rising {
            self.stats.rising_edges += 1;
        }
        self.inputs.read_data = read;
        self.inputs.instruction = self.system.bus.fetch(outputs.instruction_address);

        self.record(&presented, &outputs);
        (edge, outputs)
    }

    fn record(&mut self, presented: &CoreInputs, outputs: &CoreOutputs) {
        let Some(trace) = &mut self.trace else {
            return;
        };
        if let Err(e) = trace.dump(self.time, &vcd::sample(presented, outputs)) {
            tracing::warn!(error = %e, cycle = self.time, "waveform write failed; tracing stopped");
            self.trace = None;
        }
    }

    /// Feeds the pixel sink; returns `true` if the presenter asked to quit.
    fn feed_display(&mut self, edge: Edge, outputs: &CoreOutputs) -> bool {
        let Some(display) = &mut self.display else {
            return false;
        };
        let pins = match outputs.video {
            Some(pins) => pins,
            None if edge == Edge::Rising => {
                let pins = display.scanout.pins(self.system.bus.vga());
                display.scanout.advance();
                pins
            }
            None => return false,
        };
        if !display.sink.feed(&pins) {
            return false;
        }
        self.stats.frames_presented += 1;
        display.presenter.present(display.sink.frame()) == PresentAction::Quit
    }

    fn halt_sentinel_seen(&self) -> bool {
        self.halt_address
            .is_some_and(|addr| self.system.bus.memory().read(addr) == HALT_SENTINEL)
    }

    fn halt(&mut self, reason: HaltReason) -> RunState {
        tracing::info!(?reason, cycle = self.time, "simulation halted");
        self.state = RunState::Halted(reason);
        self.state
    }

    /// Advances the simulation by one iteration.
    ///
    /// The first call also performs the initial reset evaluation at time 0.
    /// Calling `step` after the simulator has halted does nothing.
    ///
    /// # Returns
    ///
    /// The state after the iteration.
    pub fn step(&mut self) -> RunState {
        if matches!(self.state, RunState::Halted(_)) {
            return self.state;
        }
        if !self.started {
            self.started = true;
            let _ = self.settle();
        }

        if self.time >= self.max_cycles {
            return self.halt(HaltReason::MaxCycles);
        }
        if self.core.finished() {
            return self.halt(HaltReason::ModelFinished);
        }

        self.time += 1;
        self.half_counter += 1;
        if self.half_counter > self.half_period {
            self.clock = self.clock.toggled();
            self.half_counter = 0;
        }
        if self.time > RESET_CYCLES && self.inputs.reset {
            self.inputs.reset = false;
            self.state = RunState::Running;
            tracing::debug!(cycle = self.time, "reset released");
        }
        self.inputs.clock = self.clock;
        self.inputs.pixel_clock = self.clock;

        let (edge, outputs) = self.settle();
        self.stats.cycles = self.time;

        if self.feed_display(edge, &outputs) {
            return self.halt(HaltReason::DisplayClosed);
        }
        if self.halt_sentinel_seen() {
            return self.halt(HaltReason::HaltSentinel);
        }
        self.state
    }

    /// Runs until halted, then flushes every output.
    ///
    /// Output failures at this point are logged and do not discard the summary;
    /// a signature that could not be written is reported as `None`.
    pub fn run(&mut self) -> RunSummary {
        tracing::info!(max_cycles = self.max_cycles, "simulation started");
        let reason = loop {
            if let RunState::Halted(reason) = self.step() {
                break reason;
            }
        };
        self.shutdown(reason)
    }

    fn shutdown(&mut self, reason: HaltReason) -> RunSummary {
        self.core.finalize();

        if let Some(trace) = self.trace.take() {
            if let Err(e) = trace.finish() {
                tracing::warn!(error = %e, "waveform flush failed");
            }
        }

        if let Some(display) = &mut self.display {
            let _ = display.presenter.present(display.sink.frame());
            self.stats.frames_presented += 1;
        }

        let signature_words = self.signature.take().and_then(|sink| {
            let path = sink.path().to_path_buf();
            sink.emit(self.system.bus.memory())
                .inspect_err(|e| {
                    tracing::warn!(error = %e, path = %path.display(), "signature write failed");
                })
                .ok()
        });

        self.stats.cycles = self.time;
        self.stats.writes = *self.system.bus.write_counts();
        self.stats.serial_bytes = self.system.serial_bytes();

        RunSummary {
            reason,
            cycles: self.time,
            signature_words,
            stats: self.stats.clone(),
        }
    }
}

impl<C: CoreModel> std::fmt::Debug for Simulator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("time", &self.time)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("tracing", &self.trace.is_some())
            .field("display", &self.display.is_some())
            .finish_non_exhaustive()
    }
}
