pub mod program;
pub mod simulator;
pub mod timing;

pub use program::{InstructionStep, ProgramBuilder, ProgramType, SimulationProgram};
pub use simulator::{RST75_VECTOR, RunState, Simulator, Tick, interrupt_entry};
pub use timing::{CycleType, MachineCycle, infer_cycles, interrupt_cycles, total_t_states};
