//! Interactive command parsing.

/// One line of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Step,
    /// Run until halted, or for at most this many ticks.
    Run(Option<usize>),
    Interrupt,
    Back,
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
s        step one instruction (also: empty line)
r [N]    run N ticks, or until halted
i        raise RST 7.5
b        step back
x        reset
h        this help
q        quit";

/// Parse a command line. The first word selects the command; only `r`
/// takes an argument.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(Command::Step);
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "s" | "step" => Command::Step,
        "r" | "run" => match words.next() {
            Some(n) => Command::Run(Some(
                n.parse()
                    .map_err(|_| format!("not a tick count: {n}"))?,
            )),
            None => Command::Run(None),
        },
        "i" | "int" | "interrupt" => Command::Interrupt,
        "b" | "back" => Command::Back,
        "x" | "reset" => Command::Reset,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (h for help)")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument: {extra}"));
    }
    Ok(cmd)
}
