//! Regular-expression and `for`-loop demonstrations.
//!
//! The binary evaluates a fixed catalogue of [`demo::Step`]s and prints one
//! line per evaluation. Regex steps are written as JavaScript literals and
//! compiled through [`pattern::Pattern`].
//!
//! ```rust
//! use tutor::pattern::Pattern;
//!
//! let mut p = Pattern::parse_literal(r"/(\w{5})(\d)/").unwrap();
//! assert!(p.test("abcdef1#"));
//! ```

pub mod cli;
pub mod demo;
pub mod pattern;
