pub mod core;
pub mod cpu;

pub mod prelude {
    pub use crate::core::program::{InstructionStep, ProgramBuilder, ProgramType, SimulationProgram};
    pub use crate::core::simulator::{RST75_VECTOR, RunState, Simulator, Tick, interrupt_entry};
    pub use crate::core::timing::{CycleType, MachineCycle, infer_cycles};
    pub use crate::cpu::{CpuState, Flags, Instruction, Reg, RegPair, Registers};
}
