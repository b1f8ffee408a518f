//! Intel 8085 instruction subset used by the simulator scenarios.
//!
//! Instructions are plain data. [`Instruction::execute`] is the single
//! dispatcher that turns one of them plus a previous [`CpuState`] into the
//! next state; the helpers it calls live in the `alu`, `branch`,
//! `load_store` and `stack` submodules as `impl CpuState` blocks.

mod alu;
mod branch;
mod io;
mod load_store;
mod stack;

use std::fmt;

use crate::cpu::state::{CpuState, Reg, RegPair};

pub use io::MATRIX_PREFIX;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// LXI rp,data16
    Lxi { pair: RegPair, value: u16 },
    /// MVI r,data8
    Mvi { dst: Reg, value: u8 },
    /// MOV dst,src
    Mov { dst: Reg, src: Reg },
    /// Rotate A right, bit 0 into both CY and bit 7.
    Rrc,
    /// ADC r: A = A + r + CY
    Adc { src: Reg },
    /// ACI data8: A = A + data + CY
    Aci { value: u8 },
    Inr { reg: Reg },
    Dcr { reg: Reg },
    Push { pair: RegPair },
    Pop { pair: RegPair },
    /// STA addr: memory[addr] = A
    Sta { addr: u16 },
    /// OUT port. With `capture` set the value is also appended to the
    /// output buffer as decimal text.
    Out { port: u8, capture: bool },
    Jmp { target: u16 },
    Jnz { target: u16 },
    Jc { target: u16 },
    Call { target: u16 },
    Ret,
    Ei,
    Di,
    Hlt,
    /// Display subroutine collapsed into one step: renders A as
    /// `"DEGER: XX"` onto the LED matrix.
    ScrollHex,
}

impl Instruction {
    /// Encoded size in bytes.
    pub fn width(&self) -> u16 {
        match self {
            Instruction::Lxi { .. }
            | Instruction::Sta { .. }
            | Instruction::Jmp { .. }
            | Instruction::Jnz { .. }
            | Instruction::Jc { .. }
            | Instruction::Call { .. } => 3,
            Instruction::Mvi { .. } | Instruction::Aci { .. } | Instruction::Out { .. } => 2,
            _ => 1,
        }
    }

    /// Opcode token as it appears in the listing (text before the first space).
    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::Lxi { .. } => "LXI",
            Instruction::Mvi { .. } => "MVI",
            Instruction::Mov { .. } => "MOV",
            Instruction::Rrc => "RRC",
            Instruction::Adc { .. } => "ADC",
            Instruction::Aci { .. } => "ACI",
            Instruction::Inr { .. } => "INR",
            Instruction::Dcr { .. } => "DCR",
            Instruction::Push { .. } => "PUSH",
            Instruction::Pop { .. } => "POP",
            Instruction::Sta { .. } => "STA",
            Instruction::Out { .. } => "OUT",
            Instruction::Jmp { .. } => "JMP",
            Instruction::Jnz { .. } => "JNZ",
            Instruction::Jc { .. } => "JC",
            Instruction::Call { .. } => "CALL",
            Instruction::Ret => "RET",
            Instruction::Ei => "EI",
            Instruction::Di => "DI",
            Instruction::Hlt => "HLT",
            Instruction::ScrollHex => "SCROLL",
        }
    }

    /// True for instructions that always replace PC.
    pub fn is_unconditional_transfer(&self) -> bool {
        matches!(
            self,
            Instruction::Jmp { .. } | Instruction::Call { .. } | Instruction::Ret
        )
    }

    /// Execute against `prev` and return the resulting state.
    ///
    /// PC is first set to `fall_through` (normally the step address plus the
    /// instruction width); transfers of control overwrite it afterwards.
    /// `prev` is never modified.
    pub fn execute(&self, prev: &CpuState, fall_through: u16) -> CpuState {
        let mut next = prev.clone();
        next.registers.pc = fall_through;

        match *self {
            // ===== Data movement =====
            Instruction::Lxi { pair, value } => next.perform_lxi(pair, value),
            Instruction::Mvi { dst, value } => next.registers.set(dst, value),
            Instruction::Mov { dst, src } => next.perform_mov(dst, src),
            Instruction::Sta { addr } => next.perform_sta(addr),

            // ===== Arithmetic / rotate =====
            Instruction::Rrc => next.perform_rrc(),
            Instruction::Adc { src } => {
                let operand = next.registers.get(src);
                next.perform_adc(operand);
            }
            Instruction::Aci { value } => next.perform_adc(value),
            Instruction::Inr { reg } => next.perform_inr(reg),
            Instruction::Dcr { reg } => next.perform_dcr(reg),

            // ===== Stack =====
            Instruction::Push { pair } => next.push_pair(pair),
            Instruction::Pop { pair } => next.pop_pair(pair),

            // ===== I/O =====
            Instruction::Out { port, capture } => next.perform_out(port, capture),
            Instruction::ScrollHex => next.perform_scroll_hex(),

            // ===== Branch =====
            Instruction::Jmp { target } => next.jump(target),
            Instruction::Jnz { target } => next.jump_if(!next.flags.z, target),
            Instruction::Jc { target } => next.jump_if(next.flags.cy, target),
            Instruction::Call { target } => next.call(target, fall_through),
            Instruction::Ret => next.ret(),

            // ===== Control =====
            // Interrupt masking is not modelled; EI/DI/HLT only advance PC.
            Instruction::Ei | Instruction::Di | Instruction::Hlt => {}
        }

        next
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Lxi { pair, value } => write!(f, "LXI {}, {:04X}H", pair.name(), value),
            Instruction::Mvi { dst, value } => write!(f, "MVI {}, {:02X}H", dst.name(), value),
            Instruction::Mov { dst, src } => write!(f, "MOV {}, {}", dst.name(), src.name()),
            Instruction::Adc { src } => write!(f, "ADC {}", src.name()),
            Instruction::Aci { value } => write!(f, "ACI {:02X}H", value),
            Instruction::Inr { reg } => write!(f, "INR {}", reg.name()),
            Instruction::Dcr { reg } => write!(f, "DCR {}", reg.name()),
            Instruction::Push { pair } => write!(f, "PUSH {}", pair.name()),
            Instruction::Pop { pair } => write!(f, "POP {}", pair.name()),
            Instruction::Sta { addr } => write!(f, "STA {:04X}H", addr),
            Instruction::Out { port, .. } => write!(f, "OUT {:02X}H", port),
            Instruction::Jmp { target } => write!(f, "JMP {:04X}H", target),
            Instruction::Jnz { target } => write!(f, "JNZ {:04X}H", target),
            Instruction::Jc { target } => write!(f, "JC {:04X}H", target),
            Instruction::Call { target } => write!(f, "CALL {:04X}H", target),
            Instruction::ScrollHex => f.write_str("SCROLL HEX"),
            Instruction::Rrc
            | Instruction::Ret
            | Instruction::Ei
            | Instruction::Di
            | Instruction::Hlt => f.write_str(self.opcode()),
        }
    }
}
