//! JavaScript-style regular expressions on top of the [`regex`] crate.
//!
//! A [`Pattern`] is built from a regex literal such as `/^[a-z]+\d*$/ig`.
//! The source is rewritten into the `regex` dialect so that it keeps its
//! JavaScript meaning:
//!
//! | JS source   | Compiled as                    |
//! |-------------|--------------------------------|
//! | `\d`        | `[0-9]` (`0-9` inside a class) |
//! | `\D`        | `[^0-9]`                       |
//! | `\w`        | `[0-9A-Za-z_]`                 |
//! | `\W`        | `[^0-9A-Za-z_]`                |
//! | `\b`        | `(?-u:\b)`, backspace in a class |
//! | `.`         | any char but `\n \r U+2028 U+2029` |
//! | `[]` `[^]`  | never / any char               |
//! | `\/`        | `/`                            |
//!
//! Under `i` every literal is expanded to its case variants using the
//! JavaScript rule that a non-ASCII character never folds onto an ASCII one.
//! Ranges are folded only across ASCII letters.
//!
//! ## Flags
//!
//! | Flag | Effect |
//! |------|--------|
//! | `g`  | [`Pattern::test`] resumes from `lastIndex` and advances it |
//! | `i`  | Case-insensitive, expanded during translation |
//! | `m`  | `^` and `$` match at line breaks |
//! | `s`  | `.` matches newlines |
//! | `y`  | Sticky: a match must start exactly at `lastIndex` |
//!
//! `\B` keeps the `regex` crate's Unicode meaning: its ASCII form can split
//! a UTF-8 sequence, which `Regex` rejects.
//!
//! `lastIndex` is a byte offset. Every subject in this crate is ASCII, so it
//! agrees with the UTF-16 index a browser would report.

use std::fmt;

use regex::{Regex, RegexBuilder};
use tracing::trace;

// ── Public types ─────────────────────────────────────────────────────────────

/// The flag set written after the closing `/` of a regex literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub sticky: bool,
}

impl Flags {
    /// Parse a flag string such as `"ig"`.
    ///
    /// Unknown or repeated flags are rejected, as a JavaScript engine does.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        let mut flags = Flags::default();
        for ch in s.chars() {
            let slot = match ch {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'y' => &mut flags.sticky,
                c => {
                    return Err(PatternError::InvalidFlags(format!(
                        "unknown flag '{c}' in \"{s}\""
                    )));
                }
            };
            if *slot {
                return Err(PatternError::InvalidFlags(format!(
                    "duplicate flag '{ch}' in \"{s}\""
                )));
            }
            *slot = true;
        }
        Ok(flags)
    }

    /// `true` when [`Pattern::test`] reads and writes `lastIndex`.
    fn tracks_last_index(&self) -> bool {
        self.global || self.sticky
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, ch) in [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.sticky, 'y'),
        ] {
            if set {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Error returned when a pattern cannot be compiled.
#[derive(Debug)]
pub enum PatternError {
    InvalidRegex(regex::Error),
    InvalidFlags(String),
    MalformedLiteral(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::InvalidRegex(e) => write!(f, "regex error: {e}"),
            PatternError::InvalidFlags(msg) => write!(f, "flag error: {msg}"),
            PatternError::MalformedLiteral(msg) => write!(f, "malformed literal: {msg}"),
        }
    }
}

impl std::error::Error for PatternError {}

/// A compiled pattern together with its `lastIndex` state.
#[derive(Clone)]
pub struct Pattern {
    src: String,
    flags: Flags,
    regex: Regex,
    last_index: usize,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("src", &self.src)
            .field("flags", &self.flags)
            .field("last_index", &self.last_index)
            .finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.src, self.flags)
    }
}

impl Pattern {
    /// Compile JavaScript regex source `src` with `flags`.
    pub fn new(src: &str, flags: Flags) -> Result<Self, PatternError> {
        let translated = translate(src, flags);
        trace!(src, %translated, "compiling pattern");
        let regex = RegexBuilder::new(&translated)
            .multi_line(flags.multiline)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(PatternError::InvalidRegex)?;
        Ok(Self {
            src: src.to_owned(),
            flags,
            regex,
            last_index: 0,
        })
    }

    /// Compile a full literal of the form `/source/flags`.
    pub fn parse_literal(literal: &str) -> Result<Self, PatternError> {
        let body = literal
            .strip_prefix('/')
            .ok_or_else(|| malformed(literal, "missing opening '/'"))?;
        let close =
            closing_slash(body).ok_or_else(|| malformed(literal, "missing closing '/'"))?;
        let (src, flags) = (&body[..close], &body[close + 1..]);
        if src.is_empty() {
            return Err(malformed(literal, "empty source"));
        }
        Pattern::new(src, Flags::parse(flags)?)
    }

    /// The source between the slashes, untranslated.
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Where the next `g`/`y` search starts.
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn set_last_index(&mut self, index: usize) {
        self.last_index = index;
    }

    /// Returns `true` if the pattern matches `text`.
    ///
    /// Without `g` or `y` this is a plain search and `lastIndex` is left
    /// alone. With either flag the search starts at `lastIndex`; a hit moves
    /// `lastIndex` to the end of the match, a miss resets it to 0. Under `y`
    /// the match must begin exactly at `lastIndex`.
    pub fn test(&mut self, text: &str) -> bool {
        if !self.flags.tracks_last_index() {
            return self.regex.is_match(text);
        }
        let start = self.last_index;
        let found = if start > text.len() || !text.is_char_boundary(start) {
            None
        } else {
            self.regex.find_at(text, start)
        };
        match found.filter(|m| !self.flags.sticky || m.start() == start) {
            Some(m) => {
                self.last_index = m.end();
                true
            }
            None => {
                self.last_index = 0;
                false
            }
        }
    }
}

fn malformed(literal: &str, why: &str) -> PatternError {
    PatternError::MalformedLiteral(format!("{why} in {literal:?}"))
}

// ── Literal scanning ──────────────────────────────────────────────────────────

/// Byte offset of the `/` that ends the source part of a literal body.
///
/// Escaped slashes and slashes inside `[...]` belong to the source.
fn closing_slash(body: &str) -> Option<usize> {
    let mut escaped = false;
    let mut in_class = false;
    for (i, ch) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Some(i),
            _ => {}
        }
    }
    None
}

// ── Dialect translation ───────────────────────────────────────────────────────

const WORD: &str = "0-9A-Za-z_";
const WORD_CLASS: &str = "[0-9A-Za-z_]";
const NOT_WORD_CLASS: &str = "[^0-9A-Za-z_]";
const NOT_LINE_TERMINATOR: &str = r"[^\n\r\x{2028}\x{2029}]";

/// Rewrite JavaScript regex source into the `regex` crate dialect.
///
/// The `i` flag is expanded here into explicit case variants instead of
/// being handed to the `regex` crate, whose Unicode folding lets `k` match
/// U+212A KELVIN SIGN.
fn translate(src: &str, flags: Flags) -> String {
    let chars: Vec<char> = src.chars().collect();
    let fold = flags.ignore_case;
    let mut out = String::with_capacity(src.len() + 16);
    let mut i = 0;
    while let Some(&ch) = chars.get(i) {
        i += 1;
        match ch {
            '\\' => i = escape(&chars, i, false, &mut out),
            '[' => i = class(&chars, i, fold, &mut out),
            '.' if !flags.dot_all => out.push_str(NOT_LINE_TERMINATOR),
            '(' if chars[i..].starts_with(&['?', '<'])
                && !matches!(chars.get(i + 2), Some('=' | '!')) =>
            {
                // Named group: the name is copied untouched.
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == '>')
                    .map_or(chars.len(), |p| i + p + 1);
                out.push('(');
                out.extend(&chars[i..end]);
                i = end;
            }
            c => push_literal(&mut out, c, fold),
        }
    }
    out
}

/// Translate the escape whose backslash ends just before `chars[i]`.
/// Returns the index after the escape.
fn escape(chars: &[char], mut i: usize, in_class: bool, out: &mut String) -> usize {
    let Some(&next) = chars.get(i) else {
        // Dangling escape; let the regex parser report it.
        out.push('\\');
        return i;
    };
    i += 1;
    match (next, in_class) {
        ('d', false) => out.push_str("[0-9]"),
        ('D', _) => out.push_str("[^0-9]"),
        ('w', false) => out.push_str(WORD_CLASS),
        ('W', _) => out.push_str(NOT_WORD_CLASS),
        ('b', false) => out.push_str(r"(?-u:\b)"),
        ('d', true) => out.push_str("0-9"),
        ('w', true) => out.push_str(WORD),
        // Backspace inside a class.
        ('b', true) => out.push_str(r"\x08"),
        ('/', _) => out.push('/'),
        (c @ ('x' | 'u' | 'p' | 'P'), _) => {
            out.push('\\');
            out.push(c);
            let len = match (c, chars.get(i)) {
                (_, Some('{')) => chars[i..].iter().position(|&ch| ch == '}').map_or(0, |p| p + 1),
                ('x', _) => 2,
                ('u', _) => 4,
                _ => 0,
            };
            let end = (i + len).min(chars.len());
            out.extend(&chars[i..end]);
            i = end;
        }
        (c, _) => {
            out.push('\\');
            out.push(c);
        }
    }
    i
}

/// Translate a `[...]` class whose `[` ends just before `chars[i]`.
/// Returns the index after the closing `]`.
fn class(chars: &[char], mut i: usize, fold: bool, out: &mut String) -> usize {
    let negated = chars.get(i) == Some(&'^');
    if negated {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        // `[]` never matches; `[^]` matches anything.
        out.push_str(if negated { "(?s:.)" } else { r"[^\x00-\x{10FFFF}]" });
        return i + 1;
    }
    out.push_str(if negated { "[^" } else { "[" });
    let mut closed = false;
    while let Some(&ch) = chars.get(i) {
        i += 1;
        match ch {
            ']' => {
                closed = true;
                break;
            }
            '\\' => i = escape(chars, i, true, out),
            lo => match (chars.get(i), chars.get(i + 1)) {
                (Some('-'), Some(&hi)) if hi != ']' && hi != '\\' => {
                    push_range(out, lo, hi, fold);
                    i += 2;
                }
                _ => push_class_member(out, lo, fold),
            },
        }
    }
    // An unclosed class is left for the regex parser to reject.
    if closed {
        out.push(']');
    }
    i
}

fn push_literal(out: &mut String, c: char, fold: bool) {
    let variants = if fold { case_variants(c) } else { vec![c] };
    if variants.len() == 1 {
        out.push(c);
    } else {
        out.push('[');
        out.extend(variants);
        out.push(']');
    }
}

fn push_class_member(out: &mut String, c: char, fold: bool) {
    let variants = if fold { case_variants(c) } else { vec![c] };
    for v in variants {
        push_class_char(out, v);
    }
}

/// Set operators and nesting in the `regex` dialect are plain characters in
/// a JavaScript class.
fn push_class_char(out: &mut String, c: char) {
    if matches!(c, '[' | ']' | '-' | '&' | '~' | '^') {
        out.push('\\');
    }
    out.push(c);
}

/// Push `lo-hi`, plus the other-case range of any ASCII letters it covers.
///
/// Non-ASCII ranges are not folded.
fn push_range(out: &mut String, lo: char, hi: char, fold: bool) {
    push_class_char(out, lo);
    out.push('-');
    push_class_char(out, hi);
    if !fold {
        return;
    }
    for (a, z) in [('a', 'z'), ('A', 'Z')] {
        let (s, e) = (lo.max(a), hi.min(z));
        if s <= e {
            out.push(swap_ascii_case(s));
            out.push('-');
            out.push(swap_ascii_case(e));
        }
    }
}

fn swap_ascii_case(c: char) -> char {
    if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else {
        c.to_ascii_lowercase()
    }
}

/// JavaScript's non-Unicode `Canonicalize`: the simple uppercase mapping,
/// except that a non-ASCII character never maps onto an ASCII one.
fn canonicalize(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if c.is_ascii() || !u.is_ascii() => u,
        _ => c,
    }
}

/// Every character `c` matches under the `i` flag, `c` first.
fn case_variants(c: char) -> Vec<char> {
    let canon = canonicalize(c);
    let mut variants = vec![c];
    for d in c.to_lowercase().chain(c.to_uppercase()).chain(canon.to_lowercase()) {
        if canonicalize(d) == canon && !variants.contains(&d) {
            variants.push(d);
        }
    }
    variants
}

// ── Tests ─────────────────────────────────────────────────────────────────────
