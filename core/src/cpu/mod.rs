// Machine state
pub mod state;
pub use state::{CpuState, Flags, Memory, Reg, RegPair, Registers, INITIAL_PC, INITIAL_SP};

// Intel 8085 instruction subset
pub mod i8085;
pub use i8085::Instruction;
