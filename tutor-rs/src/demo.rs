//! The demonstration catalogue and the runner that prints it.
//!
//! Each [`Step`] is a pure function of its literals: evaluating it yields
//! the lines it prints, and nothing carries over from one step (or one run)
//! to the next. The default run prints, in order:
//!
//! | Step              | Output |
//! |-------------------|--------|
//! | `find-string`     | `false` |
//! | `password`        | `true` |
//! | `username-global` | `true` |
//! | `username`        | `true` |
//! | `count`           | `0` … `6` |
//! | `languages`       | `JavaScript`, `Python`, `GoLang` |
//!
//! `accumulate` is catalogued but only runs when named explicitly.

use std::io::{self, Write};

use tracing::debug;

use crate::pattern::{Pattern, PatternError};

// ── Public types ──────────────────────────────────────────────────────────────

/// What a step evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Compile `literal` (a `/source/flags` regex) and test it once on
    /// `subject`.
    RegexTest {
        subject: &'static str,
        literal: &'static str,
    },
    /// Print every index from `from` through `through`.
    CountLoop { from: i64, through: i64 },
    /// Print `items[i]` for `i` in `0..=through`.
    IndexLoop {
        items: &'static [&'static str],
        through: usize,
    },
    /// Push `0..=through` onto an empty array, printing the array after
    /// every push.
    AccumulateLoop { through: i64 },
}

/// A named demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: StepKind,
    /// Part of the argument-less run.
    pub default: bool,
}

/// Error raised while selecting or running steps.
#[derive(Debug)]
pub enum DemoError {
    Pattern {
        step: &'static str,
        source: PatternError,
    },
    UnknownStep(String),
    Io(io::Error),
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Pattern { step, source } => write!(f, "step {step}: {source}"),
            DemoError::UnknownStep(name) => write!(f, "unknown step: {name}"),
            DemoError::Io(e) => write!(f, "write error: {e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::Pattern { source, .. } => Some(source),
            DemoError::Io(e) => Some(e),
            DemoError::UnknownStep(_) => None,
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        DemoError::Io(e)
    }
}

// ── Catalogue ─────────────────────────────────────────────────────────────────

const LANGUAGES: &[&str] = &["JavaScript", "Python", "GoLang"];

const CATALOGUE: &[Step] = &[
    Step {
        name: "find-string",
        title: "find a literal string",
        kind: StepKind::RegexTest {
            subject: "Hello, Universe!",
            literal: "/Hello, dfjasdf/",
        },
        default: true,
    },
    Step {
        name: "password",
        title: "five word characters followed by a digit",
        kind: StepKind::RegexTest {
            subject: "abcdef1#",
            literal: r"/(\w{5})(\d)/",
        },
        default: true,
    },
    Step {
        name: "username-global",
        title: "restrict usernames (ignore case, global)",
        kind: StepKind::RegexTest {
            subject: "MaryJones34",
            literal: r"/^[a-z]([0-9][0-9]+|[a-z]+\d*)$/ig",
        },
        default: true,
    },
    Step {
        name: "username",
        title: "restrict usernames (ignore case)",
        kind: StepKind::RegexTest {
            subject: "JackOfAllTrades",
            literal: r"/^[a-z]([0-9][0-9]+|[a-z]+\d*)$/i",
        },
        default: true,
    },
    Step {
        name: "count",
        title: "count from 0 through 6",
        kind: StepKind::CountLoop { from: 0, through: 6 },
        default: true,
    },
    Step {
        name: "languages",
        title: "index into a list of languages",
        kind: StepKind::IndexLoop {
            items: LANGUAGES,
            through: 2,
        },
        default: true,
    },
    Step {
        name: "accumulate",
        title: "push indices onto an array",
        kind: StepKind::AccumulateLoop { through: 6 },
        default: false,
    },
];

/// Every step, in run order.
pub fn catalogue() -> &'static [Step] {
    CATALOGUE
}

/// The steps run when no names are given.
pub fn default_steps() -> impl Iterator<Item = &'static Step> {
    CATALOGUE.iter().filter(|s| s.default)
}

/// Look up a step by name.
pub fn find(name: &str) -> Option<&'static Step> {
    CATALOGUE.iter().find(|s| s.name == name)
}

/// Resolve `names` to steps, keeping the order given.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static Step>, DemoError> {
    names
        .iter()
        .map(|n| find(n.as_ref()).ok_or_else(|| DemoError::UnknownStep(n.as_ref().to_owned())))
        .collect()
}

// ── Evaluation ────────────────────────────────────────────────────────────────

impl Step {
    /// Evaluate the step and return the lines it prints.
    pub fn lines(&self) -> Result<Vec<String>, PatternError> {
        match self.kind {
            StepKind::RegexTest { subject, literal } => {
                let mut pattern = Pattern::parse_literal(literal)?;
                let matched = pattern.test(subject);
                debug!(step = self.name, %pattern, subject, matched, "tested");
                Ok(vec![matched.to_string()])
            }
            StepKind::CountLoop { from, through } => {
                Ok((from..=through).map(|i| i.to_string()).collect())
            }
            StepKind::IndexLoop { items, through } => Ok((0..=through)
                .map(|i| items.get(i).copied().unwrap_or("undefined").to_owned())
                .collect()),
            StepKind::AccumulateLoop { through } => {
                let mut acc = Vec::new();
                Ok((0..=through)
                    .map(|i| {
                        acc.push(i);
                        int_array(&acc)
                    })
                    .collect())
            }
        }
    }

    /// Evaluate the step and write its lines to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), DemoError> {
        debug!(step = self.name, "running");
        let lines = self.lines().map_err(|source| DemoError::Pattern {
            step: self.name,
            source,
        })?;
        for line in lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Run `steps` in order.
pub fn run<'a, W, I>(steps: I, out: &mut W) -> Result<(), DemoError>
where
    W: Write,
    I: IntoIterator<Item = &'a Step>,
{
    for step in steps {
        step.run(out)?;
    }
    Ok(())
}

/// Write one `name  title` line per catalogued step.
pub fn list<W: Write>(out: &mut W) -> io::Result<()> {
    for step in CATALOGUE {
        let note = if step.default { "" } else { " (not run by default)" };
        writeln!(out, "{:<16} {}{note}", step.name, step.title)?;
    }
    Ok(())
}

/// Console rendering of an integer array: `[]` or `[ 0, 1, 2 ]`.
fn int_array(values: &[i64]) -> String {
    if values.is_empty() {
        return "[]".to_owned();
    }
    let body: Vec<String> = values.iter().map(i64::to_string).collect();
    format!("[ {} ]", body.join(", "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(name: &str) -> Vec<String> {
        find(name).unwrap().lines().unwrap()
    }

    fn default_output() -> String {
        let mut buf = Vec::new();
        run(default_steps(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn find_string_is_false() {
        assert_eq!(lines_of("find-string"), vec!["false"]);
    }

    #[test]
    fn password_is_true() {
        assert_eq!(lines_of("password"), vec!["true"]);
    }

    #[test]
    fn usernames_are_true() {
        assert_eq!(lines_of("username-global"), vec!["true"]);
        assert_eq!(lines_of("username"), vec!["true"]);
    }

    #[test]
    fn count_prints_seven_indices() {
        assert_eq!(lines_of("count"), vec!["0", "1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn languages_in_order() {
        assert_eq!(lines_of("languages"), vec!["JavaScript", "Python", "GoLang"]);
    }

    #[test]
    fn index_past_end_is_undefined() {
        let step = Step {
            name: "t",
            title: "",
            kind: StepKind::IndexLoop {
                items: &["a"],
                through: 1,
            },
            default: false,
        };
        assert_eq!(step.lines().unwrap(), vec!["a", "undefined"]);
    }

    #[test]
    fn accumulate_prints_growing_array() {
        let lines = lines_of("accumulate");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "[ 0 ]");
        assert_eq!(lines[1], "[ 0, 1 ]");
        assert_eq!(lines[6], "[ 0, 1, 2, 3, 4, 5, 6 ]");
    }

    #[test]
    fn int_array_empty() {
        assert_eq!(int_array(&[]), "[]");
    }

    #[test]
    fn default_run_output() {
        assert_eq!(
            default_output(),
            "false\ntrue\ntrue\ntrue\n0\n1\n2\n3\n4\n5\n6\nJavaScript\nPython\nGoLang\n"
        );
    }

    #[test]
    fn default_run_is_idempotent() {
        assert_eq!(default_output(), default_output());
    }

    #[test]
    fn default_steps_skip_accumulate() {
        let names: Vec<_> = default_steps().map(|s| s.name).collect();
        assert_eq!(
            names,
            ["find-string", "password", "username-global", "username", "count", "languages"]
        );
    }

    #[test]
    fn select_keeps_given_order() {
        let steps = select(&["count", "find-string"]).unwrap();
        assert_eq!(steps[0].name, "count");
        assert_eq!(steps[1].name, "find-string");
    }

    #[test]
    fn select_unknown_step() {
        assert!(matches!(select(&["nope"]), Err(DemoError::UnknownStep(n)) if n == "nope"));
    }

    #[test]
    fn bad_literal_names_the_step() {
        let step = Step {
            name: "broken",
            title: "",
            kind: StepKind::RegexTest {
                subject: "x",
                literal: "/x/q",
            },
            default: false,
        };
        let err = step.run(&mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, DemoError::Pattern { step: "broken", .. }));
        assert!(err.to_string().starts_with("step broken: flag error"));
    }

    #[test]
    fn errors_expose_their_cause() {
        use std::error::Error;

        let err = DemoError::Pattern {
            step: "broken",
            source: PatternError::InvalidFlags("bad".to_owned()),
        };
        assert_eq!(err.source().unwrap().to_string(), "flag error: bad");
        let io = DemoError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(io.source().unwrap().to_string(), "closed");
        assert!(DemoError::UnknownStep("x".to_owned()).source().is_none());
    }

    #[test]
    fn list_marks_optional_steps() {
        let mut buf = Vec::new();
        list(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), catalogue().len());
        assert!(text
            .lines()
            .any(|l| l.starts_with("accumulate") && l.ends_with("(not run by default)")));
    }
}
