use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use sim8085_core::core::program::SimulationProgram;
use sim8085_core::core::simulator::{RST75_VECTOR, Simulator, Tick};
use sim8085_core::core::timing::{MachineCycle, interrupt_cycles};
use sim8085_core::cpu::CpuState;
use sim8085_programs::{ScenarioError, registry};
use thiserror::Error;

/// Listing text recorded for an interrupt acknowledge.
pub const INTERRUPT_CODE: &str = "RST 7.5";

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("trace JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("building scenario: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("{name}: tick {tick}: {detail}")]
    Mismatch {
        name: String,
        tick: u64,
        detail: String,
    },
}

// --- JSON trace types ---

/// Flattened snapshot of a [`CpuState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceState {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    /// Flag byte in PUSH PSW layout.
    pub psw: u8,
    /// Non-zero memory cells only.
    pub ram: Vec<(u16, u8)>,
    pub ports: Vec<(u8, u8)>,
    pub output: Vec<String>,
    pub matrix: String,
}

impl From<&CpuState> for TraceState {
    fn from(state: &CpuState) -> Self {
        let r = &state.registers;
        Self {
            pc: r.pc,
            sp: r.sp,
            a: r.a,
            b: r.b,
            c: r.c,
            d: r.d,
            e: r.e,
            h: r.h,
            l: r.l,
            psw: state.flags.to_byte(),
            ram: state.memory.iter().filter(|&(_, v)| v != 0).collect(),
            ports: state.ports.iter().map(|(&p, &v)| (p, v)).collect(),
            output: state.output_buffer.clone(),
            matrix: state.matrix_text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub tick: u64,
    /// PC at which the step (or the interrupt) was taken.
    pub address: u16,
    pub code: String,
    pub cycles: Vec<(String, u8)>,
    /// State after the step.
    pub state: TraceState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    /// Scenario name as registered, e.g. `"conversion"`.
    pub program: String,
    /// Input the scenario was built with, if any.
    #[serde(default)]
    pub input: Option<String>,
    pub max_ticks: u64,
    /// Tick numbers before which RST 7.5 was raised.
    #[serde(default)]
    pub interrupts: Vec<u64>,
    pub initial: TraceState,
    pub steps: Vec<TraceStep>,
    #[serde(rename = "final")]
    pub final_state: TraceState,
}

fn cycle_pairs(cycles: &[MachineCycle]) -> Vec<(String, u8)> {
    cycles
        .iter()
        .map(|c| (c.kind.name().to_string(), c.t_states))
        .collect()
}

// --- Recording ---

/// Build `scenario` from the registry with `input`, run it for at most
/// `max_ticks` while raising RST 7.5 before each tick number listed in
/// `interrupts`, and capture every step. The trace carries everything needed
/// to rebuild the run.
pub fn record(
    name: &str,
    scenario: &str,
    input: Option<&str>,
    max_ticks: u64,
    interrupts: &[u64],
) -> Result<Trace, TraceError> {
    let program = registry::load(scenario, input)?;
    Ok(record_program(name, program, input, max_ticks, interrupts))
}

fn record_program(
    name: &str,
    program: SimulationProgram,
    input: Option<&str>,
    max_ticks: u64,
    interrupts: &[u64],
) -> Trace {
    let scenario = program.program_type().name().to_string();
    let mut sim = Simulator::with_history_limit(0);
    sim.load(program);
    let initial = TraceState::from(sim.state());

    let mut steps = Vec::new();
    for tick in 0..max_ticks {
        if interrupts.contains(&tick) {
            sim.raise_interrupt(RST75_VECTOR);
        }
        let pc = sim.state().pc();
        let (code, cycles) = match sim.tick() {
            Tick::Executed { address } => match sim.program().and_then(|p| p.step_at(address)) {
                Some(step) => (step.code.clone(), cycle_pairs(&step.cycles)),
                None => break,
            },
            Tick::Interrupted { .. } => (INTERRUPT_CODE.to_string(), cycle_pairs(&interrupt_cycles())),
            Tick::Halted | Tick::Idle => break,
        };
        steps.push(TraceStep {
            tick,
            address: pc,
            code,
            cycles,
            state: TraceState::from(sim.state()),
        });
    }

    Trace {
        name: name.to_string(),
        program: scenario,
        input: input.map(str::to_string),
        max_ticks,
        interrupts: interrupts.to_vec(),
        initial,
        steps,
        final_state: TraceState::from(sim.state()),
    }
}

/// Rebuild the trace's scenario from the registry, record it again with the
/// same tick budget and interrupts, and compare step by step. Returns the
/// number of steps checked.
pub fn replay(trace: &Trace) -> Result<usize, TraceError> {
    let fresh = record(
        &trace.name,
        &trace.program,
        trace.input.as_deref(),
        trace.max_ticks,
        &trace.interrupts,
    )?;

    let mismatch = |tick: u64, detail: String| TraceError::Mismatch {
        name: trace.name.clone(),
        tick,
        detail,
    };

    if fresh.initial != trace.initial {
        return Err(mismatch(0, "initial state differs".to_string()));
    }
    for (expected, actual) in trace.steps.iter().zip(&fresh.steps) {
        if expected.address != actual.address || expected.code != actual.code {
            return Err(mismatch(
                expected.tick,
                format!(
                    "expected {:04X}H {}, got {:04X}H {}",
                    expected.address, expected.code, actual.address, actual.code
                ),
            ));
        }
        if expected.cycles != actual.cycles {
            return Err(mismatch(expected.tick, format!("cycles differ for {}", expected.code)));
        }
        if expected.state != actual.state {
            return Err(mismatch(expected.tick, format!("state after {} differs", expected.code)));
        }
    }
    if trace.steps.len() != fresh.steps.len() {
        return Err(mismatch(
            trace.max_ticks,
            format!("expected {} steps, got {}", trace.steps.len(), fresh.steps.len()),
        ));
    }
    if fresh.final_state != trace.final_state {
        return Err(mismatch(trace.max_ticks, "final state differs".to_string()));
    }
    Ok(trace.steps.len())
}

// --- Trace files ---

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Write traces as JSON, gzip-compressed when `path` ends in `.gz`.
pub fn write_traces(path: &Path, traces: &[Trace]) -> Result<(), TraceError> {
    let file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer(&mut encoder, traces)?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        serde_json::to_writer_pretty(&mut file, traces)?;
        file.flush()?;
    }
    Ok(())
}

pub fn read_traces(path: &Path) -> Result<Vec<Trace>, TraceError> {
    let file = BufReader::new(File::open(path)?);
    let traces = if is_gzip(path) {
        serde_json::from_reader(GzDecoder::new(file))?
    } else {
        serde_json::from_reader(file)?
    };
    Ok(traces)
}
