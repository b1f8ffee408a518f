use crate::cpu::state::CpuState;

/// Label shown in front of the accumulator on the LED matrix.
pub const MATRIX_PREFIX: &str = "DEGER";

impl CpuState {
    /// OUT port: latch A on the port. Captured writes also land in the
    /// output buffer.
    pub(crate) fn perform_out(&mut self, port: u8, capture: bool) {
        let a = self.registers.a;
        self.ports.insert(port, a);
        if capture {
            self.output_buffer.push(a.to_string());
        }
    }

    pub(crate) fn perform_scroll_hex(&mut self) {
        self.matrix_text = format!("{MATRIX_PREFIX}: {:02X}", self.registers.a);
    }
}
