//! Command-line argument parsing.
//!
//! Usage:
//!   tutor [-lh] [<step>...]
//!
//! With no arguments every default step runs in catalogue order.

// ── Public types ──────────────────────────────────────────────────────────────

pub const USAGE: &str = "Usage: tutor [-l|--list] [-h|--help] [<step>...]";

/// Parsed command-line arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Print the step catalogue and exit (`-l`, `--list`).
    pub list: bool,
    /// Print usage and exit (`-h`, `--help`).
    pub help: bool,
    /// Steps to run, in the order given; empty means the default run.
    pub steps: Vec<String>,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut iter = argv.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            // `--` ends flag processing.
            "--" => {
                args.steps.extend(iter.by_ref().cloned());
                break;
            }
            "--list" => args.list = true,
            "--help" => args.help = true,
            long if long.starts_with("--") => {
                return Err(format!("unknown option: {long}"));
            }
            short if short.starts_with('-') && short.len() > 1 => {
                for c in short[1..].chars() {
                    match c {
                        'l' => args.list = true,
                        'h' => args.help = true,
                        c => return Err(format!("unknown option: -{c}")),
                    }
                }
            }
            name => args.steps.push(name.to_owned()),
        }
    }

    Ok(args)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
