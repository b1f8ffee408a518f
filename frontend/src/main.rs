use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use sim8085_core::core::simulator::Simulator;
use sim8085_programs::registry;

mod config;
mod display;
mod emulator;
mod input;

use config::Config;
use display::Marquee;

#[derive(Parser, Debug)]
#[command(name = "sim8085", about = "Intel 8085 teaching simulator")]
struct Args {
    /// Scenario to load (see --list).
    #[arg(required_unless_present = "list")]
    scenario: Option<String>,

    /// Input value for scenarios that take one (conversion: 0-255).
    #[arg(long)]
    input: Option<String>,

    /// Free-run on the clock instead of printing the final state.
    #[arg(long)]
    run: bool,

    /// Tick budget (overrides max_ticks from the config file).
    #[arg(long, value_name = "N")]
    ticks: Option<usize>,

    /// Clock rate in instructions per second; 0 runs unthrottled.
    #[arg(long, value_name = "F")]
    hz: Option<f64>,

    /// Raise RST 7.5 before tick T (repeatable).
    #[arg(long = "interrupt-at", value_name = "T")]
    interrupt_at: Vec<u64>,

    /// Read commands from stdin (s, r [N], i, b, x, q).
    #[arg(long, conflicts_with = "run")]
    interactive: bool,

    /// List available scenarios and exit.
    #[arg(long)]
    list: bool,

    /// Config file (default: <config dir>/sim8085/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn list_scenarios() {
    for entry in registry::all() {
        let input = if entry.takes_input { " <input>" } else { "" };
        println!("{:<12} {}{}", entry.name, entry.description, input);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        list_scenarios();
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(ticks) = args.ticks {
        config.max_ticks = ticks;
    }
    if let Some(hz) = args.hz {
        config.clock_hz = hz;
    }
    config.validate().context("invalid --hz")?;

    let Some(name) = args.scenario.as_deref() else {
        list_scenarios();
        return Ok(());
    };
    let entry = registry::find(name).unwrap_or_else(|| {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        eprintln!("Unknown scenario: {name}");
        eprintln!("Available: {}", names.join(", "));
        std::process::exit(1);
    });
    let program = (entry.create)(args.input.as_deref())
        .with_context(|| format!("building scenario {name}"))?;

    let mut sim = Simulator::with_history_limit(config.history_limit);
    sim.load(program);
    if !args.interrupt_at.is_empty() && !emulator::accepts_interrupt(&sim) {
        bail!("scenario {name} has no RST 7.5 service routine; --interrupt-at is not supported");
    }
    let mut marquee = Marquee::default();
    let mut stdout = io::stdout().lock();

    if args.interactive {
        emulator::interactive(&mut sim, &mut marquee, &config, io::stdin().lock(), &mut stdout)?;
        return Ok(());
    }

    // Without --run the program runs unthrottled and silently, and only the
    // final panels are shown.
    let mut sink = io::sink();
    let mut trace_out: &mut dyn Write = if args.run { &mut stdout } else { &mut sink };
    let hz = if args.run { config.clock_hz } else { 0.0 };
    emulator::run_clocked(
        &mut sim,
        &mut marquee,
        config.max_ticks,
        hz,
        &args.interrupt_at,
        &mut trace_out,
    )?;
    writeln!(stdout, "{}", display::render(&sim, &marquee, &config))?;
    Ok(())
}
