//! Typed failures surfaced by puzzle generation.
//!
//! Unsolvable search results are not errors; they surface as
//! `SolveOutcome::Unsolved`. Malformed board strings are not errors either:
//! parsing is deliberately lenient.

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A retry budget ran out before a valid solution grid or a solvable
    /// mask was found. A fresh attempt may well succeed.
    GenerationExhausted { tries: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::GenerationExhausted { tries } => {
                write!(f, "puzzle generation exhausted its retry budget after {} tries", tries)
            }
        }
    }
}

impl StdError for Error {}
