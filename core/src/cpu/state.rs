//! Machine state snapshot types.
//!
//! A [`CpuState`] is a value: every instruction produces a fresh one from the
//! previous snapshot and never writes through a shared reference. The memory
//! map sits behind an [`Arc`] and is cloned on the first write, so keeping old
//! snapshots around (history, diffs) costs one pointer per snapshot until a
//! step actually touches memory.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Program counter after power-on / reset.
pub const INITIAL_PC: u16 = 0x2000;
/// Stack pointer after power-on / reset (top of the 64K address space).
pub const INITIAL_SP: u16 = 0xFFFF;
/// Matrix display contents when nothing has been written yet.
pub const BLANK_MATRIX: &str = "  ";

/// 8-bit general-purpose registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reg {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg {
    pub fn name(self) -> &'static str {
        match self {
            Reg::A => "A",
            Reg::B => "B",
            Reg::C => "C",
            Reg::D => "D",
            Reg::E => "E",
            Reg::H => "H",
            Reg::L => "L",
        }
    }
}

/// Register pairs as named by PUSH/POP/LXI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegPair {
    B,   // BC
    D,   // DE
    H,   // HL
    Sp,  // stack pointer (LXI only)
    Psw, // A + flags (PUSH/POP only)
}

impl RegPair {
    pub fn name(self) -> &'static str {
        match self {
            RegPair::B => "B",
            RegPair::D => "D",
            RegPair::H => "H",
            RegPair::Sp => "SP",
            RegPair::Psw => "PSW",
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum FlagBit {
    S = 0x80,   // Sign
    Z = 0x40,   // Zero
    AC = 0x10,  // Auxiliary carry
    P = 0x04,   // Parity (even)
    ONE = 0x02, // Always set in the PSW image
    CY = 0x01,  // Carry
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn get(&self, reg: Reg) -> u8 {
        match reg {
            Reg::A => self.a,
            Reg::B => self.b,
            Reg::C => self.c,
            Reg::D => self.d,
            Reg::E => self.e,
            Reg::H => self.h,
            Reg::L => self.l,
        }
    }

    #[inline]
    pub fn set(&mut self, reg: Reg, val: u8) {
        match reg {
            Reg::A => self.a = val,
            Reg::B => self.b = val,
            Reg::C => self.c = val,
            Reg::D => self.d = val,
            Reg::E => self.e = val,
            Reg::H => self.h = val,
            Reg::L => self.l = val,
        }
    }

    /// Read a register pair as (high, low). PSW is not stored here; callers
    /// combine A with [`Flags::to_byte`] themselves.
    pub fn pair(&self, pair: RegPair) -> (u8, u8) {
        match pair {
            RegPair::B => (self.b, self.c),
            RegPair::D => (self.d, self.e),
            RegPair::H => (self.h, self.l),
            RegPair::Sp => ((self.sp >> 8) as u8, self.sp as u8),
            RegPair::Psw => (self.a, 0),
        }
    }

    pub fn set_pair(&mut self, pair: RegPair, hi: u8, lo: u8) {
        match pair {
            RegPair::B => {
                self.b = hi;
                self.c = lo;
            }
            RegPair::D => {
                self.d = hi;
                self.e = lo;
            }
            RegPair::H => {
                self.h = hi;
                self.l = lo;
            }
            RegPair::Sp => self.sp = (hi as u16) << 8 | lo as u16,
            RegPair::Psw => self.a = hi,
        }
    }
}

/// The five 8085 condition flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub s: bool,
    pub z: bool,
    pub ac: bool,
    pub p: bool,
    pub cy: bool,
}

impl Flags {
    /// Pack into the PSW low byte: S Z 0 AC 0 P 1 CY.
    pub fn to_byte(self) -> u8 {
        let mut byte = FlagBit::ONE as u8;
        for (set, bit) in [
            (self.s, FlagBit::S),
            (self.z, FlagBit::Z),
            (self.ac, FlagBit::AC),
            (self.p, FlagBit::P),
            (self.cy, FlagBit::CY),
        ] {
            if set {
                byte |= bit as u8;
            }
        }
        byte
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            s: byte & FlagBit::S as u8 != 0,
            z: byte & FlagBit::Z as u8 != 0,
            ac: byte & FlagBit::AC as u8 != 0,
            p: byte & FlagBit::P as u8 != 0,
            cy: byte & FlagBit::CY as u8 != 0,
        }
    }

    /// Set S, Z and P from an 8-bit result.
    #[inline]
    pub(crate) fn set_szp(&mut self, result: u8) {
        self.s = result & 0x80 != 0;
        self.z = result == 0;
        self.p = result.count_ones() % 2 == 0;
    }
}

/// Sparse 64K memory. Unset addresses read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cells: Arc<BTreeMap<u16, u8>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    /// Write a byte, detaching from any snapshot that shares the same map.
    pub fn write(&mut self, addr: u16, val: u8) {
        Arc::make_mut(&mut self.cells).insert(addr, val);
    }

    /// Iterate over every address that has been written, in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.cells.iter().map(|(&addr, &val)| (addr, val))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when both maps are the same allocation (no copy has happened yet).
    pub fn shares_storage_with(&self, other: &Memory) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

/// Complete machine state at one point in simulated time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    pub registers: Registers,
    pub flags: Flags,
    pub memory: Memory,
    /// Decimal text of every captured OUT, oldest first.
    pub output_buffer: Vec<String>,
    /// Last value written to each output port.
    pub ports: BTreeMap<u8, u8>,
    /// Text currently driving the LED matrix peripheral.
    pub matrix_text: String,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::initial()
    }
}

impl CpuState {
    /// Power-on state: everything zero except SP=FFFFH and PC=2000H.
    pub fn initial() -> Self {
        Self {
            registers: Registers {
                sp: INITIAL_SP,
                pc: INITIAL_PC,
                ..Registers::default()
            },
            flags: Flags::default(),
            memory: Memory::new(),
            output_buffer: Vec::new(),
            ports: BTreeMap::new(),
            matrix_text: BLANK_MATRIX.to_string(),
        }
    }

    /// Power-on state with the program counter at `pc`.
    pub fn at(pc: u16) -> Self {
        let mut state = Self::initial();
        state.registers.pc = pc;
        state
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.registers.sp
    }

    /// Last value written to `port`, zero if never written.
    pub fn port(&self, port: u8) -> u8 {
        self.ports.get(&port).copied().unwrap_or(0)
    }
}
