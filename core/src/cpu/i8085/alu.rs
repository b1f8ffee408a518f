use crate::cpu::state::{CpuState, Reg};

impl CpuState {
    // --- Rotate ---

    /// RRC: bit 0 goes to both CY and bit 7. Only CY is affected.
    pub(crate) fn perform_rrc(&mut self) {
        let a = self.registers.a;
        let lsb = a & 0x01;
        self.registers.a = (a >> 1) | (lsb << 7);
        self.flags.cy = lsb != 0;
    }

    // --- Add with carry ---

    /// A = A + operand + CY. S, Z, AC, P, CY affected.
    pub(crate) fn perform_adc(&mut self, operand: u8) {
        let a = self.registers.a;
        let carry = self.flags.cy as u16;
        let result16 = a as u16 + operand as u16 + carry;
        let result = result16 as u8;
        self.registers.a = result;
        self.flags.cy = result16 > 0xFF;
        self.flags.ac = (a & 0x0F) + (operand & 0x0F) + carry as u8 > 0x0F;
        self.flags.set_szp(result);
    }

    // --- Increment / Decrement (CY untouched) ---

    pub(crate) fn perform_inr(&mut self, reg: Reg) {
        let result = self.registers.get(reg).wrapping_add(1);
        self.registers.set(reg, result);
        self.flags.ac = result & 0x0F == 0;
        self.flags.set_szp(result);
    }

    pub(crate) fn perform_dcr(&mut self, reg: Reg) {
        let result = self.registers.get(reg).wrapping_sub(1);
        self.registers.set(reg, result);
        self.flags.ac = result & 0x0F != 0x0F;
        self.flags.set_szp(result);
    }
}
