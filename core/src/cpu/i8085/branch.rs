use crate::cpu::state::CpuState;

impl CpuState {
    #[inline]
    pub(crate) fn jump(&mut self, target: u16) {
        self.registers.pc = target;
    }

    /// Conditional jump: PC already holds the fall-through address.
    #[inline]
    pub(crate) fn jump_if(&mut self, taken: bool, target: u16) {
        if taken {
            self.registers.pc = target;
        }
    }

    /// CALL: push the return address, then jump.
    pub(crate) fn call(&mut self, target: u16, return_addr: u16) {
        self.push_word((return_addr >> 8) as u8, return_addr as u8);
        self.registers.pc = target;
    }

    /// RET: pop PC from the stack.
    pub(crate) fn ret(&mut self) {
        let (hi, lo) = self.pop_word();
        self.registers.pc = (hi as u16) << 8 | lo as u16;
    }

    /// Hardware restart: push the current PC and vector to `vector`.
    /// Shares the byte order and SP arithmetic of CALL.
    pub(crate) fn restart(&mut self, vector: u16) {
        let pc = self.registers.pc;
        self.call(vector, pc);
    }
}
