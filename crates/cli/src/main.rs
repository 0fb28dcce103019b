//! Co-simulation harness CLI.
//!
//! This binary runs a core model against the simulated bus. It performs:
//! 1. **Configuration:** Builds the run configuration from an optional JSON file,
//!    then applies command-line overrides.
//! 2. **Run:** Loads the boot image, drives the core model until a termination
//!    condition, and writes the waveform, signature and frames that were requested.
//! 3. **Symbols:** Prints the compliance signature window resolved from an ELF.
//!
//! Serial output from the guest goes to stdout; logs go to stderr (`RUST_LOG`).

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cosim_core::common::error::{HarnessError, Result};
use cosim_core::config::{self, Config, SignatureWindow};
use cosim_core::core::ReplayCore;
use cosim_core::sim::{Simulator, loader};
use cosim_core::soc::System;

#[derive(Parser, Debug)]
#[command(
    name = "cosim",
    author,
    version,
    about = "Cycle-driven co-simulation harness",
    long_about = "Drive a clock-stepped core model against flat memory, a timer, a serial \
transmitter and a VGA pixel sink.\n\nNumbers accept decimal or 0x-prefixed hex.\n\nExamples:\n  \
cosim run --image game.bin --time 50000000 --vga --frames out/\n  \
cosim run --image rv32ui-add.bin --halt 0x0ffc --signature 0x8000 0x8100 add.sig\n  \
cosim run --config run.json --stimulus smoke.json --vcd smoke.vcd"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation.
    Run(RunArgs),

    /// Print the signature window symbols of a compliance test ELF.
    Symbols {
        /// Compliance test ELF.
        elf: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON run configuration; other flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw boot image loaded into memory before the first cycle.
    #[arg(short = 'f', long, alias = "instruction")]
    image: Option<PathBuf>,

    /// Byte address the boot image is loaded at.
    #[arg(long, value_parser = parse_u32)]
    load_offset: Option<u32>,

    /// Maximum number of simulated cycles.
    #[arg(short, long, value_parser = parse_u64)]
    time: Option<u64>,

    /// Memory capacity in 32-bit words.
    #[arg(short, long, value_parser = parse_u64)]
    memory: Option<u64>,

    /// Halt-check address polled for the 0xBABECAFE sentinel.
    #[arg(long, value_parser = parse_u32)]
    halt: Option<u32>,

    /// VCD waveform output.
    #[arg(long)]
    vcd: Option<PathBuf>,

    /// Signature window and output: BEGIN END PATH.
    #[arg(long, num_args = 3, value_names = ["BEGIN", "END", "PATH"])]
    signature: Option<Vec<String>>,

    /// Compliance ELF whose begin_signature/end_signature symbols bound the signature.
    #[arg(long, requires = "signature_out", conflicts_with = "signature")]
    elf: Option<PathBuf>,

    /// Signature output used together with --elf.
    #[arg(long, requires = "elf")]
    signature_out: Option<PathBuf>,

    /// Enable the VGA pixel sink.
    #[arg(long)]
    vga: bool,

    /// Save every presented frame as PNG into this directory (implies --vga).
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Stop after this many presented frames (implies --vga).
    #[arg(long, value_parser = parse_u64)]
    max_frames: Option<u64>,

    /// JSON bus stimulus replayed by the built-in core model.
    #[arg(short, long)]
    stimulus: Option<PathBuf>,

    /// Print run statistics at the end.
    #[arg(long)]
    stats: bool,
}

fn parse_u32(s: &str) -> std::result::Result<u32, String> {
    config::parse_number(s).map_err(|e| e.to_string())
}

fn parse_u64(s: &str) -> std::result::Result<u64, String> {
    config::parse_number_u64(s).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Symbols { elf } => cmd_symbols(&elf),
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Builds the run configuration: JSON file first, then flag overrides.
fn build_config(args: &RunArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(image) = &args.image {
        config.memory.boot_image = Some(image.clone());
    }
    if let Some(offset) = args.load_offset {
        config.memory.load_offset = offset;
    }
    if let Some(cycles) = args.time {
        config.general.max_cycles = cycles;
    }
    if let Some(words) = args.memory {
        config.memory.words = usize::try_from(words)
            .map_err(|_| HarnessError::InvalidNumber(words.to_string()))?;
    }
    if args.halt.is_some() {
        config.general.halt_address = args.halt;
    }
    if let Some(vcd) = &args.vcd {
        config.trace.vcd = Some(vcd.clone());
    }

    if let Some([begin, end, path]) = args.signature.as_deref() {
        config.trace.signature = Some(SignatureWindow {
            begin: config::parse_number(begin)?,
            end: config::parse_number(end)?,
            path: PathBuf::from(path),
        });
    }
    if let (Some(elf), Some(out)) = (&args.elf, &args.signature_out) {
        let (begin, end) = loader::resolve_signature_symbols(elf)?;
        config.trace.signature = Some(SignatureWindow {
            begin,
            end,
            path: out.clone(),
        });
    }

    if args.vga || args.frames.is_some() || args.max_frames.is_some() {
        config.display.enabled = true;
    }
    if let Some(dir) = &args.frames {
        config.display.frames_dir = Some(dir.clone());
    }
    if args.max_frames.is_some() {
        config.display.max_frames = args.max_frames;
    }

    config.validate()?;
    Ok(config)
}

/// Runs one simulation with the built-in replay core model.
fn cmd_run(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;

    let core = match &args.stimulus {
        Some(path) => ReplayCore::from_json_file(path)?,
        None => ReplayCore::new(config.memory.load_offset, Vec::new()),
    };
    let system = System::new(&config)?;
    let mut sim = Simulator::new(core, system, &config)?;

    let summary = sim.run();
    tracing::info!(
        reason = ?summary.reason,
        cycles = summary.cycles,
        "run complete"
    );
    if let Some(words) = summary.signature_words {
        tracing::info!(words, "signature emitted");
    }
    for read in sim.core().reads() {
        tracing::info!(
            address = format_args!("{:#010x}", read.address),
            data = format_args!("{:#010x}", read.data),
            "stimulus read"
        );
    }
    if args.stats {
        summary.stats.print();
    }
    Ok(())
}

/// Prints the resolved signature window of a compliance ELF.
fn cmd_symbols(elf: &std::path::Path) -> Result<()> {
    let (begin, end) = loader::resolve_signature_symbols(elf)?;
    println!("begin_signature {begin:#010x}");
    println!("end_signature   {end:#010x}");
    println!("words           {}", end.saturating_sub(begin) / 4);
    Ok(())
}
