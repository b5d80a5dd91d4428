//! Difficulty scoring derived from search statistics.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tries threshold splitting Easy from Medium inside the no-guess bucket.
const EASY_ROUNDS: u32 = 4;

/// Search effort for one solve: boards dequeued from the guess queue
/// (`depth`), the highest guess tier needed (`guess_level`), and total
/// propagation rounds (`tries`).
///
/// Comparison and equality consider `(depth, guess_level)` only; two solves
/// with the same tuple rank equal no matter how many rounds they burned.
/// `tries` is kept for finer-grained reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Difficulty {
    pub depth: u32,
    pub guess_level: u8,
    pub tries: u32,
}

impl Difficulty {
    /// Sentinel marking a failed generation or an unsolved search.
    pub const UNSOLVABLE: Difficulty = Difficulty {
        depth: 0,
        guess_level: 0,
        tries: 0,
    };

    pub fn new(depth: u32, guess_level: u8, tries: u32) -> Self {
        Self {
            depth,
            guess_level,
            tries,
        }
    }

    pub fn is_unsolvable(&self) -> bool {
        self.depth == 0
    }

    /// Human-readable band for reporting. `tries` only distinguishes Easy
    /// from Medium within the straight-propagation bucket.
    pub fn label(&self) -> &'static str {
        if self.is_unsolvable() {
            "Unsolvable"
        } else if self.guess_level == 0 {
            if self.tries <= EASY_ROUNDS {
                "Easy"
            } else {
                "Medium"
            }
        } else if self.guess_level == 1 {
            "Hard"
        } else {
            "Diabolical"
        }
    }
}

impl PartialEq for Difficulty {
    fn eq(&self, other: &Self) -> bool {
        (self.depth, self.guess_level) == (other.depth, other.guess_level)
    }
}

impl Eq for Difficulty {}

impl PartialOrd for Difficulty {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Difficulty {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.depth, self.guess_level).cmp(&(other.depth, other.guess_level))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (depth {}, guess level {}, {} rounds)",
            self.label(),
            self.depth,
            self.guess_level,
            self.tries
        )
    }
}
