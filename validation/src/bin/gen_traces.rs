use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::Rng;
use sim8085_programs::conversion::parse_input;
use sim8085_validation::{TraceError, record, write_traces};

/// Tick budget for one conversion run (the program needs a little over 100).
const CONVERSION_TICKS: u64 = 200;

/// Counter run length and the ticks before which RST 7.5 is raised.
const COUNTER_TICKS: u64 = 2000;
const COUNTER_INTERRUPTS: [u64; 4] = [10, 101, 777, 1500];

fn write_conversion(out_dir: &Path, value: u8) -> Result<(), TraceError> {
    let input = value.to_string();
    let trace = record(
        &format!("conversion {value}"),
        "conversion",
        Some(&input),
        CONVERSION_TICKS,
        &[],
    )?;
    let out_path = out_dir.join(format!("{value:03}.json.gz"));
    write_traces(&out_path, std::slice::from_ref(&trace))?;
    println!(
        "Generated {} steps for input {} -> {}",
        trace.steps.len(),
        value,
        out_path.display()
    );
    Ok(())
}

fn write_counter(out_dir: &Path) -> Result<(), TraceError> {
    let trace = record(
        "counter with interrupts",
        "counter",
        None,
        COUNTER_TICKS,
        &COUNTER_INTERRUPTS,
    )?;
    let out_path = out_dir.join("rst75.json.gz");
    write_traces(&out_path, std::slice::from_ref(&trace))?;
    println!(
        "Generated {} counter steps ({} interrupts) -> {}",
        trace.steps.len(),
        COUNTER_INTERRUPTS.len(),
        out_path.display()
    );
    Ok(())
}

fn usage() -> ! {
    eprintln!("Usage: gen_traces <all | random N | VALUE>");
    eprintln!("Examples:");
    eprintln!("  gen_traces 10          # conversion of 10");
    eprintln!("  gen_traces random 16   # 16 random conversion inputs");
    eprintln!("  gen_traces all         # every input plus the counter trace");
    std::process::exit(1);
}

fn run(args: &[String]) -> Result<(), TraceError> {
    let conversion_dir = Path::new("test_data/conversion");
    let counter_dir = Path::new("test_data/counter");
    fs::create_dir_all(conversion_dir)?;

    match args {
        [cmd] if cmd == "all" => {
            for value in 0..=255u8 {
                write_conversion(conversion_dir, value)?;
            }
            fs::create_dir_all(counter_dir)?;
            write_counter(counter_dir)?;
            println!("Generated traces for 256 inputs and the counter");
        }
        [cmd, count] if cmd == "random" => {
            let count: usize = count.parse().unwrap_or_else(|_| usage());
            let mut rng = rand::thread_rng();
            let mut picked = BTreeSet::new();
            while picked.len() < count.min(256) {
                picked.insert(rng.r#gen::<u8>());
            }
            for value in picked {
                write_conversion(conversion_dir, value)?;
            }
        }
        [value] => match parse_input(value) {
            Ok(value) => write_conversion(conversion_dir, value)?,
            Err(e) => {
                eprintln!("{e}");
                usage();
            }
        },
        _ => usage(),
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("gen_traces: {e}");
        std::process::exit(1);
    }
}
