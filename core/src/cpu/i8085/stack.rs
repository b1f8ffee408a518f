use crate::cpu::state::{CpuState, Flags, RegPair};

impl CpuState {
    /// Push a 16-bit value as two bytes: high at SP-1, low at SP-2, SP -= 2.
    pub(crate) fn push_word(&mut self, hi: u8, lo: u8) {
        let sp = self.registers.sp;
        self.memory.write(sp.wrapping_sub(1), hi);
        self.memory.write(sp.wrapping_sub(2), lo);
        self.registers.sp = sp.wrapping_sub(2);
    }

    /// Pop two bytes: low from SP, high from SP+1, SP += 2.
    pub(crate) fn pop_word(&mut self) -> (u8, u8) {
        let sp = self.registers.sp;
        let lo = self.memory.read(sp);
        let hi = self.memory.read(sp.wrapping_add(1));
        self.registers.sp = sp.wrapping_add(2);
        (hi, lo)
    }

    /// PUSH rp. PUSH PSW stores A above the packed flag byte.
    pub(crate) fn push_pair(&mut self, pair: RegPair) {
        let (hi, lo) = match pair {
            RegPair::Psw => (self.registers.a, self.flags.to_byte()),
            _ => self.registers.pair(pair),
        };
        self.push_word(hi, lo);
    }

    /// POP rp. POP PSW restores A and all five flags.
    pub(crate) fn pop_pair(&mut self, pair: RegPair) {
        let (hi, lo) = self.pop_word();
        if pair == RegPair::Psw {
            self.flags = Flags::from_byte(lo);
        }
        self.registers.set_pair(pair, hi, lo);
    }
}
