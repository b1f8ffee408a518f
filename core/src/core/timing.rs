//! Machine-cycle metadata for the bus timing diagram.
//!
//! Timing is looked up from the opcode token of a listing line, not decoded
//! from real opcodes. It never feeds back into [`CpuState`](crate::cpu::CpuState).

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CycleType {
    OpcodeFetch,
    MemoryRead,
    MemoryWrite,
    IoRead,
    IoWrite,
}

impl CycleType {
    pub fn name(self) -> &'static str {
        match self {
            CycleType::OpcodeFetch => "OPCODE_FETCH",
            CycleType::MemoryRead => "MEMORY_READ",
            CycleType::MemoryWrite => "MEMORY_WRITE",
            CycleType::IoRead => "IO_READ",
            CycleType::IoWrite => "IO_WRITE",
        }
    }

    /// IO/M is high for I/O cycles.
    pub fn is_io(self) -> bool {
        matches!(self, CycleType::IoRead | CycleType::IoWrite)
    }

    /// RD is strobed for fetches and reads, WR for writes.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            CycleType::OpcodeFetch | CycleType::MemoryRead | CycleType::IoRead
        )
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One bus transaction and its length in T-states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MachineCycle {
    pub kind: CycleType,
    pub t_states: u8,
}

impl MachineCycle {
    pub const fn new(kind: CycleType, t_states: u8) -> Self {
        Self { kind, t_states }
    }
}

const fn fetch(t: u8) -> MachineCycle {
    MachineCycle::new(CycleType::OpcodeFetch, t)
}
const READ: MachineCycle = MachineCycle::new(CycleType::MemoryRead, 3);
const WRITE: MachineCycle = MachineCycle::new(CycleType::MemoryWrite, 3);
const IO_READ: MachineCycle = MachineCycle::new(CycleType::IoRead, 3);
const IO_WRITE: MachineCycle = MachineCycle::new(CycleType::IoWrite, 3);

/// Infer the machine cycles for a listing line such as `"MVI A, 0AH"`.
///
/// Only the opcode token (text before the first space) matters. Unknown
/// opcodes, including empty input, get a single 4T opcode fetch, so the
/// result is never empty.
pub fn infer_cycles(code: &str) -> Vec<MachineCycle> {
    let token = code
        .trim_start()
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();

    match token.as_str() {
        "LXI" => vec![fetch(4), READ, READ],
        "MVI" => vec![fetch(4), READ],
        "ACI" | "ADI" | "SUI" | "SBI" | "ANI" | "ORI" | "XRI" | "CPI" => vec![fetch(4), READ],
        "MOV" | "RRC" | "RLC" | "RAR" | "RAL" | "ADC" | "ADD" | "SUB" | "DCR" | "INR" | "EI"
        | "DI" | "NOP" => vec![fetch(4)],
        "PUSH" => vec![fetch(6), WRITE, WRITE],
        "POP" => vec![fetch(4), READ, READ],
        "OUT" => vec![fetch(4), READ, IO_WRITE],
        "IN" => vec![fetch(4), READ, IO_READ],
        "STA" => vec![fetch(4), READ, READ, WRITE],
        "LDA" => vec![fetch(4), READ, READ, READ],
        "HLT" => vec![fetch(5)],
        "JMP" | "JNZ" | "JZ" | "JC" | "JNC" | "JP" | "JM" | "JPE" | "JPO" => {
            vec![fetch(4), READ, READ]
        }
        "CALL" => vec![fetch(6), READ, READ, WRITE, WRITE],
        "RET" => vec![fetch(4), READ, READ],
        _ => vec![fetch(4)],
    }
}

/// RST 7.5 acknowledge: the restart is internal, then PC is pushed.
pub fn interrupt_cycles() -> Vec<MachineCycle> {
    vec![fetch(6), WRITE, WRITE]
}

/// Sum of T-states over a cycle list.
pub fn total_t_states(cycles: &[MachineCycle]) -> u32 {
    cycles.iter().map(|c| c.t_states as u32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(code: &str) -> Vec<(CycleType, u8)> {
        infer_cycles(code)
            .into_iter()
            .map(|c| (c.kind, c.t_states))
            .collect()
    }

    #[test]
    fn lxi_is_fetch_read_read() {
        assert_eq!(
            kinds("LXI SP, FFFFH"),
            vec![
                (CycleType::OpcodeFetch, 4),
                (CycleType::MemoryRead, 3),
                (CycleType::MemoryRead, 3)
            ]
        );
    }

    #[test]
    fn push_uses_six_state_fetch() {
        let c = infer_cycles("PUSH B");
        assert_eq!(c[0], fetch(6));
        assert_eq!(c[1].kind, CycleType::MemoryWrite);
        assert_eq!(total_t_states(&c), 12);
    }

    #[test]
    fn out_ends_in_io_write() {
        let c = infer_cycles("OUT 01H");
        assert_eq!(c.last().map(|c| c.kind), Some(CycleType::IoWrite));
        assert_eq!(total_t_states(&c), 10);
    }

    #[test]
    fn call_is_eighteen_states() {
        assert_eq!(total_t_states(&infer_cycles("CALL 0050H")), 18);
    }

    #[test]
    fn hlt_is_five_state_fetch() {
        assert_eq!(infer_cycles("HLT"), vec![fetch(5)]);
    }

    #[test]
    fn unknown_defaults_to_single_fetch() {
        for code in ["SCROLL HEX", "", "   ", "???", "xyz abc"] {
            assert_eq!(infer_cycles(code), vec![fetch(4)], "code {code:?}");
        }
    }

    #[test]
    fn opcode_token_is_case_insensitive() {
        assert_eq!(infer_cycles("mvi a, 00h"), infer_cycles("MVI A, 00H"));
    }

    #[test]
    fn interrupt_acknowledge_is_twelve_states() {
        assert_eq!(total_t_states(&interrupt_cycles()), 12);
    }
}
