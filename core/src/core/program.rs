//! Synthesized programs: an ordered list of steps addressed by PC.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::timing::{MachineCycle, infer_cycles, total_t_states};
use crate::cpu::{CpuState, Instruction};

/// Which scenario produced a program.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProgramType {
    Conversion,
    Counter,
}

impl ProgramType {
    pub fn name(self) -> &'static str {
        match self {
            ProgramType::Conversion => "conversion",
            ProgramType::Counter => "counter",
        }
    }
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProgramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conversion" => Ok(ProgramType::Conversion),
            "counter" => Ok(ProgramType::Counter),
            other => Err(format!("unknown program type: {other}")),
        }
    }
}

/// One position in a synthesized program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionStep {
    /// PC value at which this step is fetched.
    pub address: u16,
    /// Listing text, e.g. `"MVI A, 0AH"`.
    pub code: String,
    pub description: String,
    /// Bus activity for the timing diagram, inferred from `code`.
    pub cycles: Vec<MachineCycle>,
    pub instruction: Instruction,
    /// Bytes this step occupies; PC advances by this much unless the
    /// instruction transfers control.
    pub width: u16,
}

impl InstructionStep {
    pub fn new(address: u16, instruction: Instruction, description: impl Into<String>) -> Self {
        Self::with_width(address, instruction, description, instruction.width())
    }

    pub fn with_width(
        address: u16,
        instruction: Instruction,
        description: impl Into<String>,
        width: u16,
    ) -> Self {
        let code = instruction.to_string();
        let cycles = infer_cycles(&code);
        Self {
            address,
            code,
            description: description.into(),
            cycles,
            instruction,
            width,
        }
    }

    /// Address of the next sequential step.
    #[inline]
    pub fn fall_through(&self) -> u16 {
        self.address.wrapping_add(self.width)
    }

    /// Apply this step to `prev`, producing the next state.
    pub fn execute(&self, prev: &CpuState) -> CpuState {
        self.instruction.execute(prev, self.fall_through())
    }

    pub fn t_states(&self) -> u32 {
        total_t_states(&self.cycles)
    }
}

/// Output of a program builder. Immutable once built.
#[derive(Clone, Debug)]
pub struct SimulationProgram {
    program_type: ProgramType,
    entry_point: u16,
    steps: Vec<InstructionStep>,
    index: HashMap<u16, usize>,
}

impl SimulationProgram {
    pub fn program_type(&self) -> ProgramType {
        self.program_type
    }

    /// Address of the first instruction executed after load/reset.
    pub fn entry_point(&self) -> u16 {
        self.entry_point
    }

    pub fn steps(&self) -> &[InstructionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step fetched at `pc`, if any.
    pub fn step_at(&self, pc: u16) -> Option<&InstructionStep> {
        self.index.get(&pc).map(|&i| &self.steps[i])
    }

    /// List position of the step at `pc` (for listing highlight).
    pub fn index_of(&self, pc: u16) -> Option<usize> {
        self.index.get(&pc).copied()
    }

    /// Power-on state with PC at the entry point.
    pub fn initial_state(&self) -> CpuState {
        CpuState::at(self.entry_point)
    }
}

/// Assembles steps, assigning each an address from a running cursor.
pub struct ProgramBuilder {
    program_type: ProgramType,
    entry_point: u16,
    cursor: u16,
    steps: Vec<InstructionStep>,
}

impl ProgramBuilder {
    /// Start a program whose entry point and initial cursor are `origin`.
    pub fn new(program_type: ProgramType, origin: u16) -> Self {
        Self {
            program_type,
            entry_point: origin,
            cursor: origin,
            steps: Vec::new(),
        }
    }

    /// Current assembly address.
    pub fn address(&self) -> u16 {
        self.cursor
    }

    /// Move the cursor (like an ORG directive). Does not change the entry point.
    pub fn org(&mut self, address: u16) -> &mut Self {
        self.cursor = address;
        self
    }

    /// Append a step sized by its instruction width.
    pub fn emit(&mut self, instruction: Instruction, description: impl Into<String>) -> u16 {
        self.emit_with_width(instruction, description, instruction.width())
    }

    /// Append a step with an explicit width. Returns the step's address.
    pub fn emit_with_width(
        &mut self,
        instruction: Instruction,
        description: impl Into<String>,
        width: u16,
    ) -> u16 {
        debug_assert!(
            width > 0 || instruction.is_unconditional_transfer(),
            "zero-width {instruction} at {:04X}H would never advance PC",
            self.cursor
        );
        let address = self.cursor;
        self.steps
            .push(InstructionStep::with_width(address, instruction, description, width));
        self.cursor = address.wrapping_add(width);
        address
    }

    pub fn build(self) -> SimulationProgram {
        let mut index = HashMap::with_capacity(self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            let prev = index.insert(step.address, i);
            debug_assert!(prev.is_none(), "duplicate step address {:04X}H", step.address);
        }
        log::debug!(
            "built {} program: {} steps, entry {:04X}H",
            self.program_type,
            self.steps.len(),
            self.entry_point
        );
        SimulationProgram {
            program_type: self.program_type,
            entry_point: self.entry_point,
            steps: self.steps,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{Reg, RegPair};

    #[test]
    fn addresses_follow_widths() {
        let mut b = ProgramBuilder::new(ProgramType::Conversion, 0x2000);
        assert_eq!(b.emit(Instruction::Lxi { pair: RegPair::Sp, value: 0xFFFF }, "sp"), 0x2000);
        assert_eq!(b.emit(Instruction::Mvi { dst: Reg::A, value: 1 }, "a"), 0x2003);
        assert_eq!(b.emit(Instruction::Rrc, "rrc"), 0x2005);
        assert_eq!(b.emit(Instruction::Hlt, "hlt"), 0x2006);
        assert_eq!(b.address(), 0x2007);
    }

    #[test]
    fn explicit_width_overrides_table() {
        let mut b = ProgramBuilder::new(ProgramType::Counter, 0x0050);
        b.emit_with_width(Instruction::ScrollHex, "display", 4);
        assert_eq!(b.address(), 0x0054);
        let p = b.build();
        assert_eq!(p.steps()[0].fall_through(), 0x0054);
    }

    #[test]
    fn org_relocates_without_moving_entry() {
        let mut b = ProgramBuilder::new(ProgramType::Counter, 0x2000);
        b.emit(Instruction::Hlt, "main");
        b.org(0x003C).emit(Instruction::Ret, "isr");
        let p = b.build();
        assert_eq!(p.entry_point(), 0x2000);
        assert_eq!(p.step_at(0x003C).map(|s| s.code.as_str()), Some("RET"));
        assert_eq!(p.index_of(0x2000), Some(0));
        assert!(p.step_at(0x2001).is_none());
    }

    #[test]
    fn step_execute_advances_from_own_address() {
        let step = InstructionStep::new(0x2003, Instruction::Mvi { dst: Reg::A, value: 0x0A }, "");
        let next = step.execute(&CpuState::at(0x2003));
        assert_eq!(next.registers.a, 0x0A);
        assert_eq!(next.registers.pc, 0x2005);
        assert_eq!(step.t_states(), 7);
    }

    #[test]
    fn program_type_parses() {
        assert_eq!("Counter".parse::<ProgramType>(), Ok(ProgramType::Counter));
        assert_eq!(ProgramType::Conversion.to_string(), "conversion");
        assert!("blink".parse::<ProgramType>().is_err());
    }

    #[test]
    #[should_panic(expected = "duplicate step address")]
    #[cfg(debug_assertions)]
    fn duplicate_addresses_are_rejected_in_debug() {
        let mut b = ProgramBuilder::new(ProgramType::Counter, 0x2000);
        b.emit(Instruction::Ei, "a");
        b.org(0x2000).emit(Instruction::Di, "b");
        let _ = b.build();
    }
}
