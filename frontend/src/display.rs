//! Text panels for the terminal host.
//!
//! Every panel is a pure function from simulator state to a `String`, so the
//! run loops only decide when to print.

use std::fmt::Write;

use sim8085_core::core::program::{InstructionStep, ProgramType, SimulationProgram};
use sim8085_core::core::simulator::{RunState, Simulator};
use sim8085_core::cpu::{CpuState, INITIAL_SP};
use sim8085_programs::LED_PORT;
use sim8085_programs::conversion::BIT_COUNT;

use crate::config::Config;

/// Characters visible on the LED matrix at once.
pub const MATRIX_WIDTH: usize = 2;

/// Listing lines shown above and below the current step.
const LISTING_CONTEXT: usize = 4;

/// Two-character scrolling window over the matrix text.
#[derive(Debug, Default)]
pub struct Marquee {
    text: String,
    offset: usize,
}

impl Marquee {
    /// Track `text`; a change restarts the scroll.
    pub fn update(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.offset = 0;
        }
    }

    /// Move one character along, wrapping after the last.
    pub fn advance(&mut self) {
        let len = self.text.chars().count();
        if len > MATRIX_WIDTH {
            self.offset = (self.offset + 1) % len;
        }
    }

    pub fn window(&self) -> String {
        let chars: Vec<char> = self.text.chars().collect();
        if chars.len() <= MATRIX_WIDTH {
            return self.text.clone();
        }
        let end = (self.offset + MATRIX_WIDTH).min(chars.len());
        let visible: String = chars[self.offset..end].iter().collect();
        format!("{visible:<width$}", width = MATRIX_WIDTH)
    }
}

/// Captured output bits read MSB first, missing bits as zero.
fn captured_value(state: &CpuState) -> u8 {
    (0..BIT_COUNT as usize).fold(0u8, |acc, i| {
        let bit = state
            .output_buffer
            .get(i)
            .is_some_and(|token| token == "1");
        (acc << 1) | bit as u8
    })
}

/// Value shown on the LED bank.
pub fn led_value(program_type: ProgramType, state: &CpuState) -> u8 {
    match program_type {
        ProgramType::Counter => state.port(LED_PORT),
        ProgramType::Conversion => captured_value(state),
    }
}

/// Text shown on the LED matrix. Conversion shows the result in hex once all
/// bits are out; otherwise the matrix text (scrolled when too long).
pub fn matrix_value(program_type: ProgramType, state: &CpuState, marquee: &Marquee) -> String {
    if state.matrix_text.chars().count() > MATRIX_WIDTH {
        return marquee.window();
    }
    match program_type {
        ProgramType::Conversion if state.output_buffer.len() == BIT_COUNT as usize => {
            format!("{:X}", captured_value(state))
        }
        ProgramType::Conversion => " ".repeat(MATRIX_WIDTH),
        ProgramType::Counter => state.matrix_text.clone(),
    }
}

pub fn leds(value: u8) -> String {
    (0..8)
        .rev()
        .map(|bit| if value & (1 << bit) != 0 { '*' } else { '.' })
        .collect()
}

pub fn registers(state: &CpuState) -> String {
    let r = &state.registers;
    let f = &state.flags;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "A={:02X}  B={:02X}  C={:02X}  D={:02X}  E={:02X}  H={:02X}  L={:02X}",
        r.a, r.b, r.c, r.d, r.e, r.h, r.l
    );
    let _ = writeln!(out, "PC={:04X}H  SP={:04X}H", r.pc, r.sp);
    let _ = write!(
        out,
        "S={} Z={} AC={} P={} CY={}  (PSW {:02X})",
        f.s as u8,
        f.z as u8,
        f.ac as u8,
        f.p as u8,
        f.cy as u8,
        f.to_byte()
    );
    out
}

/// Listing lines around the step at `pc`, the current one marked with `>`.
pub fn listing(program: &SimulationProgram, pc: u16) -> String {
    let steps = program.steps();
    let current = program.index_of(pc);
    let center = current.unwrap_or(0);
    let start = center.saturating_sub(LISTING_CONTEXT);
    let end = (center + LISTING_CONTEXT + 1).min(steps.len());

    let mut out = String::new();
    for (i, step) in steps.iter().enumerate().take(end).skip(start) {
        let marker = if Some(i) == current { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:04X}H  {:<14} ; {}",
            step.address, step.code, step.description
        );
    }
    if current.is_none() {
        let _ = writeln!(out, "> {pc:04X}H  (no instruction)");
    }
    out.trim_end().to_string()
}

/// The top `window` bytes of memory ending at FFFFH, highest address first.
pub fn stack(state: &CpuState, window: u16) -> String {
    let sp = state.sp();
    let lowest = INITIAL_SP.saturating_sub(window.saturating_sub(1));
    let mut out = String::new();
    for addr in (lowest..=INITIAL_SP).rev() {
        let marker = if addr == sp { "<- SP" } else { "" };
        let _ = writeln!(out, "{addr:04X}H  {:02X}H {marker}", state.memory.read(addr));
    }
    out.trim_end().to_string()
}

pub fn cycles(step: &InstructionStep) -> String {
    let mut out = String::new();
    for (i, cycle) in step.cycles.iter().enumerate() {
        let strobe = if cycle.kind.is_read() { "RD" } else { "WR" };
        let _ = writeln!(
            out,
            "M{}  {:<13} {}T  IO/M={} {strobe}",
            i + 1,
            cycle.kind.name(),
            cycle.t_states,
            cycle.kind.is_io() as u8
        );
    }
    let _ = write!(out, "total {}T", step.t_states());
    out
}

pub fn status(sim: &Simulator) -> String {
    let state = match sim.run_state() {
        RunState::Idle => "idle",
        RunState::Ready => "ready",
        RunState::Running => "running",
        RunState::Halted => "halted",
        RunState::InterruptPending => "interrupt pending",
    };
    format!(
        "[{state}] ticks={} T-states={}",
        sim.ticks(),
        sim.t_states()
    )
}

/// All panels stacked vertically.
pub fn render(sim: &Simulator, marquee: &Marquee, config: &Config) -> String {
    let Some(program) = sim.program() else {
        return status(sim);
    };
    let state = sim.state();
    let program_type = program.program_type();

    let mut out = String::new();
    let _ = writeln!(out, "== {} == {}", program_type, status(sim));
    let _ = writeln!(out, "{}", registers(state));
    let _ = writeln!(out, "-- code --\n{}", listing(program, state.pc()));
    let _ = writeln!(out, "-- stack --\n{}", stack(state, config.stack_window));
    let _ = writeln!(
        out,
        "-- display --\nLEDs   {}\nMatrix [{}]",
        leds(led_value(program_type, state)),
        matrix_value(program_type, state, marquee)
    );
    if !state.output_buffer.is_empty() {
        let _ = writeln!(out, "Output {}", state.output_buffer.join(" "));
    }
    if config.show_timing
        && let Some(step) = sim.current_step()
    {
        let _ = writeln!(out, "-- timing: {} --\n{}", step.code, cycles(step));
    }
    out.trim_end().to_string()
}
