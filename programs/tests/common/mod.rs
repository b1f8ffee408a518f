#![allow(dead_code)]

use sim8085_core::core::program::SimulationProgram;
use sim8085_core::core::simulator::{Simulator, Tick};
use sim8085_core::cpu::CpuState;

/// Load `program` and tick until it halts. Panics if it never does.
pub fn run_to_halt(program: SimulationProgram) -> Simulator {
    let mut sim = Simulator::new();
    sim.load(program);
    for _ in 0..10_000 {
        if sim.tick() == Tick::Halted {
            return sim;
        }
    }
    panic!("program did not halt within 10000 ticks");
}

/// Read the captured output tokens as a big-endian binary number.
pub fn output_value(state: &CpuState) -> u16 {
    state.output_buffer.iter().fold(0u16, |acc, bit| {
        let b: u16 = bit.parse().expect("output token is a number");
        (acc << 1) | b
    })
}
