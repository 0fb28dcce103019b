//! Run statistics collection and reporting.
//!
//! This module tracks what a harness run did. It provides:
//! 1. **Clocking:** Simulated cycles, rising edges and host throughput.
//! 2. **Bus traffic:** Committed writes per target (memory, VGA, serial, timer).
//! 3. **Peripherals:** Serial bytes emitted and frames presented.
//!
//! Wall time is observation-only; nothing here feeds back into simulated state.

use std::time::Instant;

use crate::common::constants::{SELECT_MEMORY, SELECT_SERIAL, SELECT_TIMER, SELECT_VGA};

/// Run statistics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Simulated cycles (sequencer iterations).
    pub cycles: u64,
    /// Rising clock edges observed by the bus.
    pub rising_edges: u64,
    /// Committed writes per selector (index 0 is memory).
    pub writes: [u64; 8],
    /// Bytes emitted by the serial transmitter.
    pub serial_bytes: u64,
    /// Frames handed to the presenter.
    pub frames_presented: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            rising_edges: 0,
            writes: [0; 8],
            serial_bytes: 0,
            frames_presented: 0,
        }
    }
}

impl SimStats {
    /// Total committed writes across every target.
    pub fn total_writes(&self) -> u64 {
        self.writes.iter().sum()
    }

    /// Prints the selected statistics sections to stdout.
    ///
    /// Valid section names: `summary`, `bus`, `devices`. An empty slice prints all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64().max(f64::EPSILON);

        if want("summary") {
            let khz = (self.cycles as f64 / seconds) / 1000.0;
            println!("\n==========================================================");
            println!("CO-SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_rising_edges         {}", self.rising_edges);
            println!("sim_freq                 {khz:.2} kHz");
            println!("----------------------------------------------------------");
        }
        if want("bus") {
            let total = self.total_writes().max(1) as f64;
            let line = |name: &str, n: u64| {
                println!(
                    "  {name:<22} {n} ({:.2}%)",
                    (n as f64 / total) * 100.0
                );
            };
            println!("BUS WRITES");
            line("writes.memory", self.writes[usize::from(SELECT_MEMORY)]);
            line("writes.vga", self.writes[usize::from(SELECT_VGA)]);
            line("writes.serial", self.writes[usize::from(SELECT_SERIAL)]);
            line("writes.timer", self.writes[usize::from(SELECT_TIMER)]);
            println!("----------------------------------------------------------");
        }
        if want("devices") {
            println!("DEVICES");
            println!("  serial.bytes           {}", self.serial_bytes);
            println!("  display.frames         {}", self.frames_presented);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
