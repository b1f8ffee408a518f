#![allow(dead_code)]

use std::path::PathBuf;

use rand::Rng;
use sim8085_core::cpu::CpuState;

/// A fresh path under the system temp directory.
pub fn temp_path(file_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sim8085-validation-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir.join(file_name)
}

/// Randomize registers, flags and a handful of memory cells.
pub fn random_state(rng: &mut impl Rng) -> CpuState {
    let mut s = CpuState::initial();
    let r = &mut s.registers;
    r.a = rng.r#gen();
    r.b = rng.r#gen();
    r.c = rng.r#gen();
    r.d = rng.r#gen();
    r.e = rng.r#gen();
    r.h = rng.r#gen();
    r.l = rng.r#gen();
    r.sp = rng.r#gen();
    r.pc = rng.r#gen();
    s.flags.s = rng.gen_bool(0.5);
    s.flags.z = rng.gen_bool(0.5);
    s.flags.ac = rng.gen_bool(0.5);
    s.flags.p = rng.gen_bool(0.5);
    s.flags.cy = rng.gen_bool(0.5);
    for _ in 0..8 {
        s.memory.write(rng.r#gen(), rng.r#gen());
    }
    s
}
