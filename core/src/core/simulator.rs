//! Host-side stepper: owns the current program and state and drives ticks.
//!
//! Every tick either services a pending interrupt or looks up the step whose
//! address equals PC and replaces the state with that step's result. When no
//! step matches, the simulator is halted; that is the normal way a program
//! ends, not an error.

use std::collections::VecDeque;

use crate::core::program::{InstructionStep, SimulationProgram};
use crate::core::timing::{interrupt_cycles, total_t_states};
use crate::cpu::CpuState;

/// RST 7.5 vector address.
pub const RST75_VECTOR: u16 = 0x003C;

/// Snapshots kept for [`Simulator::step_back`] unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Pure interrupt-entry transition: push PC (high byte at SP-1, low byte at
/// SP-2), SP -= 2, PC = `vector`.
pub fn interrupt_entry(state: &CpuState, vector: u16) -> CpuState {
    let mut next = state.clone();
    next.restart(vector);
    next
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    /// No program loaded.
    Idle,
    /// Program loaded, waiting for ticks.
    Ready,
    /// Free-running on a clock.
    Running,
    /// PC does not match any step.
    Halted,
    /// An interrupt will be serviced on the next tick.
    InterruptPending,
}

/// Outcome of a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Nothing loaded.
    Idle,
    /// The step at `address` ran.
    Executed { address: u16 },
    /// A pending interrupt was taken.
    Interrupted { vector: u16 },
    /// No step at PC.
    Halted,
}

pub struct Simulator {
    program: Option<SimulationProgram>,
    state: CpuState,
    running: bool,
    halted: bool,
    pending_interrupt: Option<u16>,
    /// Prior states paired with the T-state total at that point.
    history: VecDeque<(CpuState, u64)>,
    history_limit: usize,
    ticks: u64,
    t_states: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            program: None,
            state: CpuState::initial(),
            running: false,
            halted: false,
            pending_interrupt: None,
            history: VecDeque::new(),
            history_limit,
            ticks: 0,
            t_states: 0,
        }
    }

    /// Replace the current program and reset to its initial state.
    pub fn load(&mut self, program: SimulationProgram) {
        log::debug!(
            "loading {} program ({} steps)",
            program.program_type(),
            program.len()
        );
        self.program = Some(program);
        self.reset();
    }

    /// Discard the current state and return to the program's initial state.
    pub fn reset(&mut self) {
        self.state = match &self.program {
            Some(program) => program.initial_state(),
            None => CpuState::initial(),
        };
        self.running = false;
        self.halted = false;
        self.pending_interrupt = None;
        self.history.clear();
        self.ticks = 0;
        self.t_states = 0;
        log::debug!("reset, PC={:04X}H", self.state.pc());
    }

    pub fn start(&mut self) {
        if self.program.is_some() && !self.halted {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Latch an interrupt request; it is serviced on the next tick.
    pub fn raise_interrupt(&mut self, vector: u16) {
        log::debug!("interrupt requested, vector {vector:04X}H");
        self.pending_interrupt = Some(vector);
    }

    pub fn run_state(&self) -> RunState {
        if self.program.is_none() {
            RunState::Idle
        } else if self.pending_interrupt.is_some() {
            RunState::InterruptPending
        } else if self.halted {
            RunState::Halted
        } else if self.running {
            RunState::Running
        } else {
            RunState::Ready
        }
    }

    /// Advance by one instruction (or one interrupt entry).
    pub fn tick(&mut self) -> Tick {
        let Some(program) = &self.program else {
            return Tick::Idle;
        };

        // Interrupts are taken instead of the next instruction, and wake a
        // halted CPU.
        if let Some(vector) = self.pending_interrupt.take() {
            let next = interrupt_entry(&self.state, vector);
            self.halted = false;
            self.ticks += 1;
            let t_states = self.t_states;
            self.t_states += total_t_states(&interrupt_cycles()) as u64;
            self.commit(next, t_states);
            log::debug!("interrupt taken, PC={vector:04X}H");
            return Tick::Interrupted { vector };
        }

        if self.halted {
            return Tick::Halted;
        }

        let pc = self.state.pc();
        let Some(step) = program.step_at(pc) else {
            self.halted = true;
            self.running = false;
            log::debug!("halted: no step at {pc:04X}H");
            return Tick::Halted;
        };

        log::trace!("{:04X}H  {}", step.address, step.code);
        let next = step.execute(&self.state);
        self.ticks += 1;
        let t_states = self.t_states;
        self.t_states += step.t_states() as u64;
        self.commit(next, t_states);
        Tick::Executed { address: pc }
    }

    /// Tick until halted or `max_ticks` have elapsed. Returns ticks consumed.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut n = 0;
        while n < max_ticks {
            match self.tick() {
                Tick::Executed { .. } | Tick::Interrupted { .. } => n += 1,
                Tick::Halted | Tick::Idle => break,
            }
        }
        n
    }

    /// Restore the snapshot before the last tick. Returns false when there
    /// is no history left.
    pub fn step_back(&mut self) -> bool {
        match self.history.pop_back() {
            Some((prev, t_states)) => {
                self.state = prev;
                self.t_states = t_states;
                self.halted = false;
                self.ticks = self.ticks.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Install `next`, remembering the outgoing state and its T-state total.
    fn commit(&mut self, next: CpuState, t_states: u64) {
        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.pop_front();
            }
            let prev = std::mem::replace(&mut self.state, next);
            self.history.push_back((prev, t_states));
        } else {
            self.state = next;
        }
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn program(&self) -> Option<&SimulationProgram> {
        self.program.as_ref()
    }

    /// The step PC currently points at.
    pub fn current_step(&self) -> Option<&InstructionStep> {
        self.program.as_ref()?.step_at(self.state.pc())
    }

    pub fn pending_interrupt(&self) -> Option<u16> {
        self.pending_interrupt
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn t_states(&self) -> u64 {
        self.t_states
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
