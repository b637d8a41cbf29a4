//! Memory hierarchy simulator - replays a trace of virtual-address accesses
//! through a TLB, a FIFO-paged page table and a data cache.
//!
//! Usage: memhier [OPTIONS]
//!
//! With no trace file the built-in sample trace is replayed against the
//! default geometry (8-word pages, 16 pages, 4 frames, 2 TLB entries,
//! 4 cache lines).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info};

use memhier::io::{read_trace, render_report, replay, sample_trace};
use memhier::{MemorySystem, SimConfig};

/// Command-line configuration
#[derive(Parser, Debug)]
#[command(name = "memhier", version, about = "Replay memory accesses through a TLB, page table and data cache")]
struct Args {
    /// TOML file overriding the default geometry
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trace file (`R <va>` / `W <va> <data>` per line); defaults to the sample trace
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Keep stale TLB entries and duplicate cache lines instead of invalidating them
    #[arg(long)]
    literal: bool,

    /// Log every TLB, cache and paging event
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    // Run the simulator and handle any errors
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main logic separated from main() for cleaner error handling
fn run(args: &Args) -> memhier::Result<()> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if args.literal {
        config.coherent = false;
    }
    info!("Configuration: {:?}", config);

    let trace = match &args.trace {
        Some(path) => read_trace(path)?,
        None => sample_trace(),
    };

    let mut system = MemorySystem::new(config)?;
    for outcome in replay(&mut system, &trace)? {
        println!("{}", outcome);
    }

    println!();
    print!("{}", render_report(system.stats()));
    Ok(())
}
