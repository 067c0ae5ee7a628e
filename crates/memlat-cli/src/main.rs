// SPDX-License-Identifier: MIT OR Apache-2.0
//! memlat CLI binary - live AVX2 memory latency and bandwidth table

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use memlat::{ARRAY_SIZE, AccessPatternEngine, LatencyAggregator, TimerKind};
use memlat_cli::os;
use memlat_cli::render::{JsonRenderer, Render, TableRenderer};
use std::io::{self, ErrorKind};
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "memlat")]
#[command(version, about, long_about = None)]
struct Args {
    /// Timing source used for every pass of the run
    #[arg(long, value_enum, default_value_t = Timer::Monotonic)]
    timer: Timer,

    /// CPU core to pin the measuring thread to
    #[arg(long, default_value = "2")]
    core: usize,

    /// Do not pin the measuring thread
    #[arg(long = "no-pin")]
    no_pin: bool,

    /// Do not raise scheduling priority
    #[arg(long = "no-priority")]
    no_priority: bool,

    /// Stop after this many rounds (0 = run until killed)
    #[arg(long, default_value = "0")]
    rounds: u64,

    /// Pause between rounds in milliseconds
    #[arg(long = "interval-ms", default_value = "1")]
    interval_ms: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Skip writing the pointer chain into the region before measuring
    #[arg(long = "no-chain")]
    no_chain: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Timer {
    /// OS monotonic clock
    Monotonic,
    /// CPU timestamp counter, calibrated at startup
    Cycles,
}

impl From<Timer> for TimerKind {
    fn from(timer: Timer) -> Self {
        match timer {
            Timer::Monotonic => Self::Monotonic,
            Timer::Cycles => Self::Cycles,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Live table redrawn in place
    Table,
    /// One JSON object per round
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let pinned = if args.no_pin {
        None
    } else {
        os::pin_preferred(args.core)
    };
    log::debug!("measuring thread pinned to {pinned:?}");
    if !args.no_priority
        && let Err(e) = os::raise_priority()
    {
        log::warn!("could not raise scheduling priority: {e}");
    }

    let mut engine = AccessPatternEngine::allocate().context("allocating measurement region")?;
    if !args.no_chain {
        engine.buffer_mut().init_pointer_chain();
    }
    log::info!(
        "measuring {} MiB with the {} backend",
        ARRAY_SIZE / (1024 * 1024),
        engine.backend()
    );

    let clock = TimerKind::from(args.timer)
        .build()
        .with_context(|| format!("initialising {} timer", TimerKind::from(args.timer)))?;
    let mut aggregator = LatencyAggregator::new(engine, clock);

    let stdout = io::stdout().lock();
    let mut renderer: Box<dyn Render> = match args.format {
        Format::Table => Box::new(TableRenderer::new(stdout)),
        Format::Json => Box::new(JsonRenderer::new(stdout)),
    };
    let interval = Duration::from_millis(args.interval_ms);

    loop {
        let report = aggregator.run_round();
        match renderer.render(&report) {
            Ok(()) => {}
            // reader went away (e.g. piped into `head`)
            Err(e) if e.kind() == ErrorKind::BrokenPipe => return Ok(()),
            Err(e) => return Err(e).context("writing report"),
        }
        if args.rounds != 0 && report.round >= args.rounds {
            return Ok(());
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
}
