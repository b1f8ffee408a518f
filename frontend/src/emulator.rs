use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use sim8085_core::core::simulator::{RST75_VECTOR, Simulator, Tick};

use crate::config::Config;
use crate::display::{self, Marquee};
use crate::input::{Command, HELP, parse_command};

/// Whether the loaded program has a service routine at the RST 7.5 vector.
/// Raising the interrupt for any other program would jump into empty memory
/// and halt it partway through.
pub fn accepts_interrupt(sim: &Simulator) -> bool {
    sim.program()
        .and_then(|p| p.step_at(RST75_VECTOR))
        .is_some()
}

/// One-line trace of a tick for the free-running view.
fn tick_line(sim: &Simulator, tick: Tick, marquee: &Marquee) -> Option<String> {
    let state = sim.state();
    let what = match tick {
        Tick::Executed { address } => {
            let code = sim
                .program()
                .and_then(|p| p.step_at(address))
                .map_or("?", |s| s.code.as_str());
            format!("{address:04X}H  {code:<14}")
        }
        Tick::Interrupted { vector } => format!("RST 7.5 -> {vector:04X}H  "),
        Tick::Halted | Tick::Idle => return None,
    };
    let program_type = sim.program()?.program_type();
    Some(format!(
        "{:>6}  {what} A={:02X} SP={:04X}H  LEDs {}  [{}]",
        sim.ticks(),
        state.registers.a,
        state.sp(),
        display::leds(display::led_value(program_type, state)),
        display::matrix_value(program_type, state, marquee)
    ))
}

/// Free-run at `hz` instructions per second (unthrottled when `hz <= 0`),
/// raising RST 7.5 before each tick number in `interrupt_at`. Stops when the
/// program halts or `max_ticks` have run. Returns ticks executed.
pub fn run_clocked(
    sim: &mut Simulator,
    marquee: &mut Marquee,
    max_ticks: usize,
    hz: f64,
    interrupt_at: &[u64],
    out: &mut impl Write,
) -> io::Result<usize> {
    let period = if hz > 0.0 {
        let period = Duration::try_from_secs_f64(1.0 / hz).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("clock rate {hz} Hz: {e}"))
        })?;
        Some(period)
    } else {
        None
    };
    let mut next_deadline = Instant::now();
    let mut executed = 0;

    sim.start();
    while executed < max_ticks {
        if interrupt_at.contains(&sim.ticks())
            && sim.pending_interrupt().is_none()
            && accepts_interrupt(sim)
        {
            log::info!("injecting RST 7.5 before tick {}", sim.ticks());
            sim.raise_interrupt(RST75_VECTOR);
        }

        let tick = sim.tick();
        marquee.update(&sim.state().matrix_text);
        marquee.advance();
        match tick_line(sim, tick, marquee) {
            Some(line) => writeln!(out, "{line}")?,
            None => break,
        }
        executed += 1;

        if let Some(period) = period {
            next_deadline += period;
            let now = Instant::now();
            if next_deadline > now {
                std::thread::sleep(next_deadline - now);
            } else {
                next_deadline = now;
            }
        }
    }
    sim.stop();
    Ok(executed)
}

/// Command loop over `input`. Panels are re-rendered after every command.
pub fn interactive(
    sim: &mut Simulator,
    marquee: &mut Marquee,
    config: &Config,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "{}", display::render(sim, marquee, config))?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
        };

        match cmd {
            Command::Quit => return Ok(()),
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Step => {
                if sim.tick() == Tick::Halted {
                    writeln!(out, "halted")?;
                }
                marquee.update(&sim.state().matrix_text);
                marquee.advance();
            }
            Command::Run(limit) => {
                let n = sim.run(limit.unwrap_or(config.max_ticks));
                marquee.update(&sim.state().matrix_text);
                writeln!(out, "ran {n} ticks")?;
            }
            Command::Interrupt if !accepts_interrupt(sim) => {
                writeln!(out, "no RST 7.5 service routine in this program")?;
            }
            Command::Interrupt => {
                sim.raise_interrupt(RST75_VECTOR);
                writeln!(out, "RST 7.5 pending")?;
            }
            Command::Back => {
                if !sim.step_back() {
                    writeln!(out, "no history")?;
                }
                marquee.update(&sim.state().matrix_text);
            }
            Command::Reset => {
                sim.reset();
                *marquee = Marquee::default();
            }
        }

        if cmd != Command::Help {
            writeln!(out, "{}", display::render(sim, marquee, config))?;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim8085_programs::{generate_conversion_program, generate_counter_program};

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).expect("utf-8 output")
    }

    #[test]
    fn clocked_run_stops_at_halt() {
        let mut sim = Simulator::new();
        sim.load(generate_conversion_program(5));
        let len = sim.program().map_or(0, |p| p.len());
        let mut buf = Vec::new();
        let n = run_clocked(&mut sim, &mut Marquee::default(), 10_000, 0.0, &[], &mut buf)
            .expect("write to vec");
        assert_eq!(n, len);
        assert!(!sim.is_running());
        assert_eq!(output(buf).lines().count(), len);
    }

    #[test]
    fn clocked_run_injects_interrupts() {
        let mut sim = Simulator::new();
        sim.load(generate_counter_program());
        let mut marquee = Marquee::default();
        let mut buf = Vec::new();
        let n = run_clocked(&mut sim, &mut marquee, 20, 0.0, &[4], &mut buf).expect("write to vec");
        assert_eq!(n, 20);
        let text = output(buf);
        assert!(text.contains("RST 7.5 -> 003CH"));
        assert!(text.contains("SCROLL HEX"));
        assert!(sim.state().matrix_text.starts_with("DEGER"));
    }

    #[test]
    fn clocked_run_rejects_unrepresentable_rate() {
        let mut sim = Simulator::new();
        sim.load(generate_counter_program());
        let err = run_clocked(&mut sim, &mut Marquee::default(), 10, 1e-300, &[], &mut Vec::new())
            .expect_err("period overflows Duration");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn interactive_commands() {
        let mut sim = Simulator::new();
        sim.load(generate_counter_program());
        let script = "s\nr 3\ni\ns\nb\nbogus\nx\nq\ns\n";
        let mut buf = Vec::new();
        interactive(
            &mut sim,
            &mut Marquee::default(),
            &Config::default(),
            script.as_bytes(),
            &mut buf,
        )
        .expect("write to vec");
        let text = output(buf);
        assert!(text.contains("ran 3 ticks"));
        assert!(text.contains("RST 7.5 pending"));
        assert!(text.contains("unknown command: bogus"));
        // Reset, then quit before the trailing step
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.state().pc(), 0x2000);
    }

    #[test]
    fn interrupt_needs_a_service_routine() {
        let mut sim = Simulator::new();
        assert!(!accepts_interrupt(&sim));
        sim.load(generate_counter_program());
        assert!(accepts_interrupt(&sim));

        sim.load(generate_conversion_program(10));
        assert!(!accepts_interrupt(&sim));
        let mut buf = Vec::new();
        interactive(
            &mut sim,
            &mut Marquee::default(),
            &Config::default(),
            "r 20\ni\nr\n".as_bytes(),
            &mut buf,
        )
        .expect("write to vec");
        assert!(output(buf).contains("no RST 7.5 service routine"));
        assert_eq!(sim.pending_interrupt(), None);
        // The conversion still completes with all eight bits
        assert_eq!(sim.state().output_buffer.len(), 8);
        assert_ne!(sim.state().pc(), RST75_VECTOR);
    }

    #[test]
    fn clocked_run_skips_interrupts_without_routine() {
        let mut sim = Simulator::new();
        sim.load(generate_conversion_program(10));
        let len = sim.program().map_or(0, |p| p.len());
        let mut buf = Vec::new();
        let n = run_clocked(&mut sim, &mut Marquee::default(), 10_000, 0.0, &[5], &mut buf)
            .expect("write to vec");
        assert_eq!(n, len);
        assert!(!output(buf).contains("RST 7.5"));
        assert_eq!(sim.state().output_buffer.len(), 8);
    }

    #[test]
    fn interactive_ends_on_eof() {
        let mut sim = Simulator::new();
        sim.load(generate_conversion_program(1));
        let mut buf = Vec::new();
        interactive(
            &mut sim,
            &mut Marquee::default(),
            &Config::default(),
            "r\n".as_bytes(),
            &mut buf,
        )
        .expect("write to vec");
        assert!(output(buf).contains("[halted]"));
    }
}
