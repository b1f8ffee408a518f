use crate::cpu::state::{CpuState, Reg, RegPair};

impl CpuState {
    /// LXI rp,data16. LXI PSW does not exist; it loads A with the high byte.
    pub(crate) fn perform_lxi(&mut self, pair: RegPair, value: u16) {
        self.registers
            .set_pair(pair, (value >> 8) as u8, value as u8);
    }

    pub(crate) fn perform_mov(&mut self, dst: Reg, src: Reg) {
        let val = self.registers.get(src);
        self.registers.set(dst, val);
    }

    pub(crate) fn perform_sta(&mut self, addr: u16) {
        self.memory.write(addr, self.registers.a);
    }
}
