//! Trace dump tool.
//!
//! Runs a monitor for a fixed stretch of simulated time and prints every
//! produced sample as CSV, for plotting or regression comparison.
//!
//! Usage:
//!   cargo run --release --bin ecg_trace -- [OPTIONS]
//!
//! Options:
//!   --condition <id>     Catalog condition (default: normal)
//!   --lead <code>        One of the 12 standard leads (default: II)
//!   --seconds <s>        Simulated duration (default: 10)
//!   --speed <mm/s>       Paper speed, 25 or 50 (default: 25)
//!   --seed <n>           Fixed seed for reproducible output
//!   --noise <fraction>   Noise level override
//!   --catalog <path>     Load conditions from a JSON or binary file
//!   --list               List catalog condition ids and exit

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use ecg_synth::prelude::*;

/// Simulated tick length in seconds.
const TICK: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Condition id from the catalog
    #[arg(long, default_value = "normal")]
    condition: String,

    /// Lead code (I, II, III, aVR, aVL, aVF, V1..V6)
    #[arg(long, default_value = "II")]
    lead: String,

    /// Simulated seconds to dump
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Paper speed in mm/s
    #[arg(long, default_value_t = 25)]
    speed: u32,

    /// Fixed seed
    #[arg(long)]
    seed: Option<u64>,

    /// Noise level in [0, 1]
    #[arg(long)]
    noise: Option<f64>,

    /// Condition catalog file (.json or binary)
    #[arg(long)]
    catalog: Option<String>,

    /// Print the catalog condition ids and exit
    #[arg(long)]
    list: bool,
}

fn load_catalog(path: Option<&str>) -> ecg_synth::Result<ConditionCatalog> {
    match path {
        Some(path) => ConditionCatalog::load_from_file_auto(path),
        None => Ok(ConditionCatalog::builtin()),
    }
}

fn run(args: &Args) -> ecg_synth::Result<()> {
    let catalog = Arc::new(load_catalog(args.catalog.as_deref())?);

    if args.list {
        for (id, profile) in catalog.iter() {
            println!("{id:<20} {:>5.0} bpm  {}", profile.base_rate, profile.name);
        }
        return Ok(());
    }

    let params = MonitorParams {
        seed: args.seed,
        lead: args.lead.parse()?,
        paper_speed: PaperSpeed::try_from(args.speed)?,
        ..Default::default()
    };

    // One pixel per sample, wide enough that nothing wraps.
    let width = (args.seconds.max(0.0) * params.paper_speed.samples_per_second()).ceil() as usize;
    let mut monitor = Monitor::with_params(width.max(1), catalog, params)?;
    monitor.set_condition(&args.condition);
    if let Some(noise) = args.noise {
        monitor.set_noise_level(noise);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let io_error = |e: io::Error| ecg_synth::EcgError::IoError {
        message: e.to_string(),
    };

    writeln!(out, "time,millivolts,alert").map_err(io_error)?;
    let baseline = monitor.params().baseline;
    let scale = monitor.params().pixels_per_millivolt * monitor.amplitude_zoom();

    let mut written = 0;
    while monitor.time() < args.seconds && written < width {
        let start = monitor.cursor();
        let steps = monitor.advance(TICK);
        for offset in 0..steps {
            let Some(sample) = monitor.read_sample((start + offset) % monitor.width()) else {
                continue;
            };
            let millivolts = (baseline - sample.vertical_position) / scale;
            writeln!(
                out,
                "{:.4},{:.5},{}",
                sample.source_time,
                millivolts,
                u8::from(sample.alert)
            )
            .map_err(io_error)?;
        }
        written += steps;
    }
    out.flush().map_err(io_error)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ecg_trace: {e}");
            ExitCode::FAILURE
        }
    }
}
