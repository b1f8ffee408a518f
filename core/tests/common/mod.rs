#![allow(dead_code)]

use sim8085_core::core::program::InstructionStep;
use sim8085_core::cpu::{CpuState, Instruction};

/// Execute one instruction at the state's current PC.
pub fn step(state: &CpuState, instruction: Instruction) -> CpuState {
    InstructionStep::new(state.pc(), instruction, "").execute(state)
}

/// Execute a sequence of instructions laid out back to back from the state's PC.
pub fn run_all(state: &CpuState, instructions: &[Instruction]) -> CpuState {
    instructions
        .iter()
        .fold(state.clone(), |s, &instr| step(&s, instr))
}

/// Power-on state with SP moved to `sp`.
pub fn with_sp(sp: u16) -> CpuState {
    let mut s = CpuState::initial();
    s.registers.sp = sp;
    s
}
