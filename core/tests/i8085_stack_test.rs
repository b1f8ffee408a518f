use sim8085_core::cpu::{Flags, Instruction, Reg, RegPair};
mod common;
use common::{run_all, step, with_sp};

// --- PUSH ---

#[test]
fn test_push_b() {
    let mut s = with_sp(0x1000);
    s.registers.b = 0x12;
    s.registers.c = 0x34;
    let next = step(&s, Instruction::Push { pair: RegPair::B });
    assert_eq!(next.sp(), 0x0FFE);
    assert_eq!(next.memory.read(0x0FFF), 0x12); // high byte (B)
    assert_eq!(next.memory.read(0x0FFE), 0x34); // low byte (C)
}

#[test]
fn test_push_psw_writes_flag_byte() {
    let mut s = with_sp(0x2000);
    s.registers.a = 0xAB;
    s.flags = Flags {
        s: true,
        z: false,
        ac: true,
        p: false,
        cy: true,
    };
    let next = step(&s, Instruction::Push { pair: RegPair::Psw });
    assert_eq!(next.memory.read(0x1FFF), 0xAB);
    assert_eq!(next.memory.read(0x1FFE), 0x80 | 0x10 | 0x02 | 0x01);
}

#[test]
fn test_push_from_top_of_memory() {
    let mut s = with_sp(0xFFFF);
    s.registers.d = 0x01;
    s.registers.e = 0x02;
    let next = step(&s, Instruction::Push { pair: RegPair::D });
    assert_eq!(next.sp(), 0xFFFD);
    assert_eq!(next.memory.read(0xFFFE), 0x01);
    assert_eq!(next.memory.read(0xFFFD), 0x02);
}

#[test]
fn test_push_wraps_at_zero() {
    let mut s = with_sp(0x0001);
    s.registers.h = 0xAA;
    s.registers.l = 0xBB;
    let next = step(&s, Instruction::Push { pair: RegPair::H });
    assert_eq!(next.sp(), 0xFFFF);
    assert_eq!(next.memory.read(0x0000), 0xAA);
    assert_eq!(next.memory.read(0xFFFF), 0xBB);
}

// --- POP ---

#[test]
fn test_push_pop_round_trip() {
    let mut s = with_sp(0xFFFF);
    s.registers.b = 0x01;
    s.registers.c = 0x08;
    let s = run_all(
        &s,
        &[
            Instruction::Push { pair: RegPair::B },
            Instruction::Mvi {
                dst: Reg::B,
                value: 0,
            },
            Instruction::Pop { pair: RegPair::D },
        ],
    );
    assert_eq!(s.sp(), 0xFFFF);
    assert_eq!(s.registers.d, 0x01);
    assert_eq!(s.registers.e, 0x08);
    assert_eq!(s.registers.b, 0x00);
}

#[test]
fn test_pop_psw_restores_flags() {
    let mut s = with_sp(0x3000);
    s.registers.a = 0x42;
    s.flags.z = true;
    s.flags.p = true;
    let pushed = step(&s, Instruction::Push { pair: RegPair::Psw });

    let mut clobbered = pushed.clone();
    clobbered.registers.a = 0;
    clobbered.flags = Flags {
        s: true,
        z: false,
        ac: true,
        p: false,
        cy: true,
    };
    let popped = step(&clobbered, Instruction::Pop { pair: RegPair::Psw });
    assert_eq!(popped.registers.a, 0x42);
    assert_eq!(popped.flags, s.flags);
    assert_eq!(popped.sp(), 0x3000);
}

#[test]
fn test_pop_leaves_memory_in_place() {
    let mut s = with_sp(0x4000);
    s.registers.b = 0x11;
    let s = step(&s, Instruction::Push { pair: RegPair::B });
    let s = step(&s, Instruction::Pop { pair: RegPair::B });
    assert_eq!(s.memory.read(0x3FFF), 0x11);
}

#[test]
fn test_lxi_sp() {
    let s = with_sp(0x1234);
    let next = step(
        &s,
        Instruction::Lxi {
            pair: RegPair::Sp,
            value: 0xFFFF,
        },
    );
    assert_eq!(next.sp(), 0xFFFF);
    assert_eq!(next.pc(), 0x2003);
}
