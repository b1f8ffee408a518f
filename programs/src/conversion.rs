//! Decimal to binary conversion through the stack.
//!
//! The input is rotated right eight times. Each rotated-out bit is captured
//! from CY into B and pushed together with the loop counter in C. Popping
//! the eight entries back yields the bits most-significant first, and each
//! one is written to the LED port and the output buffer.

use sim8085_core::core::program::{ProgramBuilder, ProgramType, SimulationProgram};
use sim8085_core::cpu::{INITIAL_PC, INITIAL_SP, Instruction, Reg, RegPair};

use crate::LED_PORT;
use crate::error::ScenarioError;
use crate::registry::ScenarioEntry;

/// Number of bits produced.
pub const BIT_COUNT: u8 = 8;

/// Host-level range check for a conversion input.
pub fn validate_input(value: i64) -> Result<u8, ScenarioError> {
    u8::try_from(value).map_err(|_| ScenarioError::InputOutOfRange(value))
}

/// Parse and range-check a decimal input such as `"10"`.
pub fn parse_input(text: &str) -> Result<u8, ScenarioError> {
    let trimmed = text.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ScenarioError::InvalidInput(trimmed.to_string()))?;
    validate_input(value)
}

/// Build the conversion program for `input`.
pub fn generate_conversion_program(input: u8) -> SimulationProgram {
    let mut b = ProgramBuilder::new(ProgramType::Conversion, INITIAL_PC);

    b.emit(
        Instruction::Lxi {
            pair: RegPair::Sp,
            value: INITIAL_SP,
        },
        "Set the stack pointer to FFFFH (top of memory)",
    );
    b.emit(
        Instruction::Mvi {
            dst: Reg::A,
            value: input,
        },
        format!("Load the input value ({input}) into the accumulator"),
    );
    b.emit(
        Instruction::Mov {
            dst: Reg::D,
            src: Reg::A,
        },
        "Keep a copy of the original number in D",
    );
    b.emit(
        Instruction::Mvi {
            dst: Reg::C,
            value: BIT_COUNT,
        },
        "Loop counter C = 8 (one pass per bit)",
    );

    // Push loop, unrolled
    for _ in 0..BIT_COUNT {
        b.emit(
            Instruction::Rrc,
            "Rotate A right; the low bit moves into CY",
        );
        b.emit(
            Instruction::Mov {
                dst: Reg::H,
                src: Reg::A,
            },
            "Save the rotated A in H",
        );
        b.emit(
            Instruction::Mvi {
                dst: Reg::A,
                value: 0x00,
            },
            "Clear A (MVI leaves CY alone)",
        );
        b.emit(
            Instruction::Aci { value: 0x00 },
            "A = 0 + 0 + CY, the bit that was rotated out",
        );
        b.emit(
            Instruction::Mov {
                dst: Reg::B,
                src: Reg::A,
            },
            "B holds the bit to push",
        );
        b.emit(
            Instruction::Mov {
                dst: Reg::A,
                src: Reg::H,
            },
            "Restore the rotated value from H",
        );
        b.emit(
            Instruction::Push { pair: RegPair::B },
            "Push B (bit) and C (counter) onto the stack",
        );
        b.emit(Instruction::Dcr { reg: Reg::C }, "Decrement the loop counter");
    }

    b.emit(
        Instruction::Mvi {
            dst: Reg::E,
            value: BIT_COUNT,
        },
        "Output counter E = 8",
    );

    // Pop loop, unrolled. Last pushed is the MSB.
    for _ in 0..BIT_COUNT {
        b.emit(
            Instruction::Pop { pair: RegPair::B },
            "Pop from the stack (B = bit, C = old counter)",
        );
        b.emit(
            Instruction::Mov {
                dst: Reg::A,
                src: Reg::B,
            },
            "Move the bit into A for output",
        );
        b.emit(
            Instruction::Out {
                port: LED_PORT,
                capture: true,
            },
            "Write the bit to the LED port and the output",
        );
        b.emit(Instruction::Dcr { reg: Reg::E }, "Decrement the output counter");
    }

    b.emit(Instruction::Hlt, "End of program");

    b.build()
}

fn create(input: Option<&str>) -> Result<SimulationProgram, ScenarioError> {
    let text = input.ok_or(ScenarioError::MissingInput)?;
    Ok(generate_conversion_program(parse_input(text)?))
}

inventory::submit! {
    ScenarioEntry::new(
        "conversion",
        "Decimal to binary via stack push/pop (input 0-255)",
        true,
        create,
    )
}
