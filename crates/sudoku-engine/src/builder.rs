//! Full-solution generation and masked-puzzle construction.
//!
//! Generation is box-by-box constraint-guided random fill with a
//! whole-attempt rollback: any failed box resets everything except the seed
//! box and the attempt restarts. Per-box backtracking would fail less often
//! but the measured retry rate never comes close to the budget.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::candidates::CandidateSet;
use crate::difficulty::Difficulty;
use crate::error::Error;
use crate::mask::{PuzzleMask, RatioMask};
use crate::solver::{SolveOutcome, Solver};

/// Whole-attempt retry budget for box filling. Roughly twice the observed
/// worst case. Mask attempts get double this.
const MAX_TRIES: u32 = 500;

/// Default percentage of cells shown by the stock mask.
const SHOW_DEFAULT: u32 = 35;

/// The remaining boxes after the seed box at (0,0), in fill order.
const BOX_ORDER: [(usize, usize); 8] = [
    (1, 0),
    (0, 1),
    (1, 1),
    (2, 0),
    (2, 1),
    (0, 2),
    (1, 2),
    (2, 2),
];

/// Marker for a failed box; converted into a whole-attempt retry.
struct BoxFailed;

/// Generate a complete, valid 9x9 solution grid.
pub fn generate_solution<R: Rng>(rng: &mut R) -> Result<Board, Error> {
    generate_solution_counted(rng).map(|(board, _)| board)
}

fn generate_solution_counted<R: Rng>(rng: &mut R) -> Result<(Board, u32), Error> {
    let mut board = Board::new();
    fill_box(&mut board, 0, 0, rng);
    let seeded = board;

    let mut build_tries = 0;
    loop {
        match fill_remaining(&mut board, rng) {
            Ok(()) => return Ok((board, build_tries)),
            Err(BoxFailed) => {
                build_tries += 1;
                if build_tries >= MAX_TRIES {
                    return Err(Error::GenerationExhausted { tries: build_tries });
                }
                // Whole-attempt rollback: only the seed box survives.
                board = seeded;
            }
        }
    }
}

fn fill_remaining<R: Rng>(board: &mut Board, rng: &mut R) -> Result<(), BoxFailed> {
    for &(box_row, box_col) in &BOX_ORDER {
        fix_box(board, box_row, box_col, rng)?;
    }
    Ok(())
}

/// Fill a box with a uniformly random permutation of 1..9. Only valid for a
/// box with no row/column constraints yet (the seed box).
fn fill_box<R: Rng>(board: &mut Board, box_row: usize, box_col: usize, rng: &mut R) {
    let mut values: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    values.shuffle(rng);
    for (i, &value) in values.iter().enumerate() {
        board.set(box_row * 3 + i / 3, box_col * 3 + i % 3, value);
    }
}

/// Fill one box under the constraints of everything already placed:
/// row/col-pruned candidates per cell, coverage validation, then
/// smallest-candidate-set-first random commits with in-box elimination.
fn fix_box<R: Rng>(
    board: &mut Board,
    box_row: usize,
    box_col: usize,
    rng: &mut R,
) -> Result<(), BoxFailed> {
    let mut cells = [(0usize, 0usize); 9];
    let mut cands = [CandidateSet::full(); 9];
    for i in 0..9 {
        let row = box_row * 3 + i / 3;
        let col = box_col * 3 + i % 3;
        cells[i] = (row, col);
        for k in 0..9 {
            if let Some(v) = board.get(row, k) {
                cands[i].remove(v);
            }
            if let Some(v) = board.get(k, col) {
                cands[i].remove(v);
            }
        }
    }

    // Every value must be placeable somewhere in the box...
    let union = cands
        .iter()
        .fold(CandidateSet::empty(), |acc, &set| acc.union(set));
    if union != CandidateSet::full() {
        return Err(BoxFailed);
    }
    // ...and no cell may already be impossible.
    if cands.iter().any(|set| set.is_empty()) {
        return Err(BoxFailed);
    }

    let mut needed = CandidateSet::full();
    let mut remaining: Vec<usize> = (0..9).collect();
    while !remaining.is_empty() {
        // Most constrained cell first; ties fall to scan order.
        let mut slot = 0;
        for (s, &i) in remaining.iter().enumerate() {
            if cands[i].len() < cands[remaining[slot]].len() {
                slot = s;
            }
        }
        let i = remaining.remove(slot);

        let pool = cands[i].intersect(needed);
        let value = match pick_random(pool, rng) {
            Some(value) => value,
            None => return Err(BoxFailed),
        };

        let (row, col) = cells[i];
        board.set(row, col, value);
        needed.remove(value);
        for &j in &remaining {
            cands[j].remove(value);
        }
    }
    Ok(())
}

/// Uniform random member of a candidate set.
fn pick_random<R: Rng>(set: CandidateSet, rng: &mut R) -> Option<u8> {
    if set.is_empty() {
        return None;
    }
    let values: Vec<u8> = set.iter().collect();
    Some(values[rng.gen_range(0..values.len())])
}

/// A generated puzzle plus the statistics downstream tooling consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPuzzle {
    /// 81-char string with hidden cells blanked.
    pub puzzle: String,
    /// 81-char fully filled solution.
    pub solution: String,
    /// Failed whole-grid fill attempts before the solution landed.
    pub build_tries: u32,
    /// Masks rejected before one produced a solvable puzzle.
    pub solve_tries: u32,
    /// Difficulty of the accepted puzzle, as scored by the solver.
    pub difficulty: Difficulty,
}

/// Drives generation end to end: a solution grid, then fresh masks until the
/// search engine can re-derive the solution from the visible cells alone.
#[derive(Debug, Clone)]
pub struct Builder {
    show_ratio: u32,
    max_mask_tries: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            show_ratio: SHOW_DEFAULT,
            max_mask_tries: MAX_TRIES * 2,
        }
    }

    /// Use a non-default show percentage for the stock ratio mask.
    pub fn with_show_ratio(show_ratio: u32) -> Self {
        Self {
            show_ratio,
            ..Self::new()
        }
    }

    /// Build a puzzle with the stock per-cell ratio mask.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<GeneratedPuzzle, Error> {
        let ratio = self.show_ratio;
        self.build_with(rng, |rng| RatioMask::new(ratio, rng))
    }

    /// Build a puzzle with a caller-supplied mask shape; `next_mask` is
    /// invoked once per attempt so every retry sees a fresh mask.
    pub fn build_with<R, M, F>(&self, rng: &mut R, mut next_mask: F) -> Result<GeneratedPuzzle, Error>
    where
        R: Rng,
        M: PuzzleMask,
        F: FnMut(&mut R) -> M,
    {
        let (solution, build_tries) = generate_solution_counted(rng)?;
        let solution_line = solution.to_string();
        let solver = Solver::new();

        let mut solve_tries = 0;
        loop {
            let mask = next_mask(rng);
            let puzzle = masked_line(&solution, &mask);
            let report = solver.solve(&Board::from_line(&puzzle));
            if let SolveOutcome::Solved(found) = &report.outcome {
                if *found == solution {
                    return Ok(GeneratedPuzzle {
                        puzzle,
                        solution: solution_line,
                        build_tries,
                        solve_tries,
                        difficulty: report.difficulty,
                    });
                }
            }
            solve_tries += 1;
            if solve_tries >= self.max_mask_tries {
                return Err(Error::GenerationExhausted { tries: solve_tries });
            }
        }
    }
}

/// Row-major 81-char puzzle string with hidden cells blanked.
fn masked_line<M: PuzzleMask>(solution: &Board, mask: &M) -> String {
    let mut out = String::with_capacity(81);
    for row in 0..9 {
        for col in 0..9 {
            match solution.get(row, col) {
                Some(v) if mask.show(row, col) => out.push(char::from(b'0' + v)),
                _ => out.push(' '),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_solutions_are_valid_and_complete() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..25 {
            let board = generate_solution(&mut rng).expect("generation within budget");
            assert!(board.is_solved());
            assert!(board.check_puzzle());
        }
    }

    /// Statistical soak over the full sample size; slow, so opt-in.
    #[test]
    #[ignore]
    fn generated_solutions_are_valid_at_scale() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let board = generate_solution(&mut rng).expect("generation within budget");
            assert!(board.is_solved());
            assert!(board.check_puzzle());
        }
    }

    #[test]
    fn generation_is_deterministic_under_a_seed() {
        let a = generate_solution(&mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate_solution(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn built_puzzle_is_masked_subset_of_its_solution() {
        let mut rng = StdRng::seed_from_u64(5);
        let generated = Builder::new().build(&mut rng).expect("build within budget");

        assert_eq!(generated.puzzle.len(), 81);
        assert_eq!(generated.solution.len(), 81);
        let solution = Board::from_line(&generated.solution);
        assert!(solution.is_solved());
        assert!(solution.check_puzzle());

        for (p, s) in generated.puzzle.chars().zip(generated.solution.chars()) {
            assert!(p == ' ' || p == s, "puzzle cell {} not in solution {}", p, s);
        }
    }

    #[test]
    fn built_puzzle_resolves_to_the_recorded_solution() {
        let mut rng = StdRng::seed_from_u64(5);
        let generated = Builder::new().build(&mut rng).expect("build within budget");

        let report = Solver::new().solve(&Board::from_line(&generated.puzzle));
        let solved = report.solved_board().expect("accepted mask must be solvable");
        assert_eq!(solved.to_string(), generated.solution);
        assert!(!generated.difficulty.is_unsolvable());
    }

    #[test]
    fn masked_line_respects_the_mask() {
        struct TopRowOnly;
        impl PuzzleMask for TopRowOnly {
            fn show(&self, row: usize, _col: usize) -> bool {
                row == 0
            }
        }

        let mut rng = StdRng::seed_from_u64(11);
        let solution = generate_solution(&mut rng).unwrap();
        let line = masked_line(&solution, &TopRowOnly);
        assert!(line[..9].chars().all(|c| c.is_ascii_digit()));
        assert!(line[9..].chars().all(|c| c == ' '));
    }

    #[test]
    fn fix_box_respects_row_and_column_constraints() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new();
        fill_box(&mut board, 0, 0, &mut rng);
        assert!(board.check_puzzle());

        // Filling the box below (1,0) must stay consistent with box (0,0)'s
        // columns whenever it succeeds.
        if fix_box(&mut board, 1, 0, &mut rng).is_ok() {
            assert!(board.check_puzzle());
            assert_eq!(board.coverage(), 18);
        }
    }
}
