//! Free-running counter with an RST 7.5 service routine.
//!
//! The main loop counts A up forever and mirrors it on the LED port. When
//! the host injects an interrupt the routine at 003CH saves PSW, calls the
//! display subroutine (which shows A on the LED matrix), restores PSW and
//! returns to wherever the loop was interrupted.

use sim8085_core::core::program::{ProgramBuilder, ProgramType, SimulationProgram};
use sim8085_core::core::simulator::RST75_VECTOR;
use sim8085_core::cpu::{INITIAL_PC, Instruction, Reg, RegPair};

use crate::LED_PORT;
use crate::error::ScenarioError;
use crate::registry::ScenarioEntry;

/// Address of the display subroutine called from the ISR.
pub const DISPLAY_ROUTINE: u16 = 0x0050;

pub fn generate_counter_program() -> SimulationProgram {
    let mut b = ProgramBuilder::new(ProgramType::Counter, INITIAL_PC);

    // --- Main loop ---
    b.emit(
        Instruction::Mvi {
            dst: Reg::A,
            value: 0x00,
        },
        "Start the counter at zero",
    );
    let lp = b.emit(
        Instruction::Out {
            port: LED_PORT,
            capture: false,
        },
        "Show A on the LED bank",
    );
    b.emit(Instruction::Inr { reg: Reg::A }, "Count up (wraps after FFH)");
    b.emit(Instruction::Jmp { target: lp }, "Loop forever");

    // --- RST 7.5 service routine ---
    b.org(RST75_VECTOR);
    b.emit(
        Instruction::Push { pair: RegPair::Psw },
        "Save A and the flags",
    );
    b.emit(
        Instruction::Call {
            target: DISPLAY_ROUTINE,
        },
        "Call the display subroutine",
    );
    b.emit(
        Instruction::Pop { pair: RegPair::Psw },
        "Restore A and the flags",
    );
    b.emit(Instruction::Ei, "Re-enable interrupts");
    b.emit(Instruction::Ret, "Return to the interrupted loop");

    // --- Display subroutine ---
    // A real routine would loop over the characters with a delay; one step
    // is enough to drive the matrix here.
    b.org(DISPLAY_ROUTINE);
    b.emit(
        Instruction::ScrollHex,
        "Format A as hex and scroll it across the LED matrix",
    );
    b.emit(Instruction::Ret, "Return from the display subroutine");

    b.build()
}

fn create(_input: Option<&str>) -> Result<SimulationProgram, ScenarioError> {
    Ok(generate_counter_program())
}

inventory::submit! {
    ScenarioEntry::new(
        "counter",
        "Free-running LED counter; RST 7.5 shows the value on the matrix",
        false,
        create,
    )
}
