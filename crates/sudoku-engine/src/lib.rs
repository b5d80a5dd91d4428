//! Sudoku engine: 9x9 board model, constraint propagation, best-first
//! backtracking search, full-grid generation, and difficulty scoring.
//!
//! The flow end to end: [`generate_solution`] fills a complete valid grid, a
//! [`PuzzleMask`] decides which cells stay visible, and [`Builder`] retries
//! masks until [`Solver`] can re-derive the solution from the visible cells,
//! scoring the accepted puzzle with a [`Difficulty`].
//!
//! All randomness flows through injected `rand::Rng` handles, so generation
//! and solving are independently deterministic under a seeded RNG.

pub mod board;
pub mod builder;
pub mod candidates;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod mask;
pub mod solver;

pub use board::Board;
pub use builder::{generate_solution, Builder, GeneratedPuzzle};
pub use candidates::{CandidateSet, GroupKind, PossibilityGrid};
pub use difficulty::Difficulty;
pub use engine::Proposal;
pub use error::Error;
pub use mask::{PuzzleMask, QuadrantMask, RatioMask, ShuffledCountMask};
pub use solver::{SolveOutcome, SolveReport, Solver};
