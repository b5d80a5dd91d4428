//! Best-first search over boards: propagation rounds, guessing, and the
//! coverage-ordered worklist.
//!
//! The worklist replaces recursive backtracking on purpose: a contradiction
//! costs one dropped queue node instead of a stack unwind, and the depth
//! cutoff bounds total work on pathological inputs.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::board::Board;
use crate::candidates::{GroupKind, PossibilityGrid};
use crate::difficulty::Difficulty;
use crate::engine::{self, Proposal};

/// Bound on boards popped from the guess queue in a single solve call.
const DEPTH_CUTOFF: usize = 500;

/// Guess tier drawn from the locked-set-narrowed grid.
const GUESS_NARROWED: u8 = 1;
/// Guess tier drawn from the raw base possibilities.
const GUESS_RAW: u8 = 2;

/// Round-scoped contradiction: two strategies disagreeing with the board, or
/// a commit that breaks row/col/box consistency. Always caught by the outer
/// loop; never escapes the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Contradiction;

/// Queue node: a board ranked by coverage, so boards closest to completion
/// are explored first. Nodes are never re-enqueued after a contradiction.
struct SearchNode {
    board: Board,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.board.coverage() == other.board.coverage()
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.board.coverage().cmp(&other.board.coverage())
    }
}

/// How a solve attempt ended.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved(Board),
    /// Queue exhaustion or depth cutoff. `best` is the highest-coverage
    /// board reached; `made_progress` distinguishes a search that committed
    /// at least one value from one that never moved (useful when diagnosing
    /// malformed inputs).
    Unsolved { best: Board, made_progress: bool },
}

/// A solve attempt's outcome plus the statistics behind its difficulty.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub difficulty: Difficulty,
}

impl SolveReport {
    pub fn solved_board(&self) -> Option<&Board> {
        match &self.outcome {
            SolveOutcome::Solved(board) => Some(board),
            SolveOutcome::Unsolved { .. } => None,
        }
    }
}

/// How one board's run of rounds ended.
enum RoundEnd {
    Solved,
    Stalled(PossibilityGrid),
    Contradiction,
}

/// The search engine. Stateless between calls; statistics are per-solve.
#[derive(Debug, Clone)]
pub struct Solver {
    depth_cutoff: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self {
            depth_cutoff: DEPTH_CUTOFF,
        }
    }

    /// Override the depth cutoff (boards popped before giving up).
    pub fn with_depth_cutoff(depth_cutoff: usize) -> Self {
        Self { depth_cutoff }
    }

    /// Solve a possibly-partial board.
    pub fn solve(&self, board: &Board) -> SolveReport {
        let mut queue = BinaryHeap::new();
        queue.push(SearchNode {
            board: *board,
        });

        let mut depth: u32 = 0;
        let mut tries: u32 = 0;
        let mut guess_level: u8 = 0;
        let mut best = *board;
        let mut made_progress = false;

        while let Some(node) = queue.pop() {
            if depth as usize >= self.depth_cutoff {
                break;
            }
            depth += 1;
            let mut working = node.board;

            let end = loop {
                if working.is_solved() {
                    // Cells filled by guesses were never range-checked, so a
                    // complete board still has to pass the full check.
                    break if working.check_puzzle() {
                        RoundEnd::Solved
                    } else {
                        RoundEnd::Contradiction
                    };
                }
                tries += 1;
                let base = engine::base_possibilities(&working);
                let proposals = round_proposals(&base);
                if proposals.is_empty() {
                    break RoundEnd::Stalled(base);
                }
                if fill_answers(&mut working, &proposals).is_err() {
                    break RoundEnd::Contradiction;
                }
                made_progress = true;
            };

            match end {
                RoundEnd::Solved => {
                    return SolveReport {
                        outcome: SolveOutcome::Solved(working),
                        difficulty: Difficulty::new(depth, guess_level, tries),
                    };
                }
                RoundEnd::Contradiction => {
                    // Abandon this board; the queue holds the siblings.
                }
                RoundEnd::Stalled(base) => {
                    if working.coverage() > best.coverage() {
                        best = working;
                    }
                    let (guesses, tier) = enumerate_guesses(&working, &base);
                    if !guesses.is_empty() {
                        guess_level = guess_level.max(tier);
                        for board in guesses {
                            queue.push(SearchNode { board });
                        }
                    }
                }
            }
        }

        SolveReport {
            outcome: SolveOutcome::Unsolved {
                best,
                made_progress,
            },
            difficulty: Difficulty::UNSOLVABLE,
        }
    }
}

/// One propagation round: strategy tiers in strict priority order; the first
/// tier that yields proposals wins the round.
fn round_proposals(base: &PossibilityGrid) -> Vec<Proposal> {
    let proposals = engine::sieve(base);
    if !proposals.is_empty() {
        return proposals;
    }
    let proposals = engine::comb(base);
    if !proposals.is_empty() {
        return proposals;
    }

    // Sieve over each comb-transformed family, unioned.
    let mut merged = Vec::new();
    for kind in GroupKind::ALL {
        merged.extend(engine::sieve(&engine::comb_transform(base, kind)));
    }
    let proposals = engine::reconcile(merged);
    if !proposals.is_empty() {
        return proposals;
    }

    // Comb over each locked-set-narrowed family, unioned.
    let mut merged = Vec::new();
    for kind in GroupKind::ALL {
        merged.extend(engine::comb(&engine::locked_set_transform(base, kind)));
    }
    engine::reconcile(merged)
}

/// Commit a round's proposals. A proposal against an already-filled cell
/// with a different value, or one whose placement breaks its row, column, or
/// box, aborts the round.
fn fill_answers(board: &mut Board, proposals: &[Proposal]) -> Result<usize, Contradiction> {
    let mut committed = 0;
    for p in proposals {
        match board.get(p.row, p.col) {
            Some(existing) if existing == p.value => {}
            Some(_) => return Err(Contradiction),
            None => {
                board.set(p.row, p.col, p.value);
                if !board.check_cell_groups(p.row, p.col) {
                    return Err(Contradiction);
                }
                committed += 1;
            }
        }
    }
    Ok(committed)
}

/// All (cell, candidate) guesses for a stalled board, preferring the most
/// constrained locked-set transform that still has content over the raw
/// grid. Returns the cloned boards and the guess tier used.
fn enumerate_guesses(board: &Board, base: &PossibilityGrid) -> (Vec<Board>, u8) {
    let mut narrowed: Option<PossibilityGrid> = None;
    let mut narrowed_count = usize::MAX;
    for kind in GroupKind::ALL {
        let grid = engine::locked_set_transform(base, kind);
        let count = grid.candidate_count();
        if count > 0 && count < narrowed_count {
            narrowed_count = count;
            narrowed = Some(grid);
        }
    }

    if let Some(grid) = narrowed {
        let boards = boards_from(board, &grid);
        if !boards.is_empty() {
            return (boards, GUESS_NARROWED);
        }
    }
    (boards_from(board, base), GUESS_RAW)
}

/// One cloned board per (empty cell, candidate) pair in the grid.
fn boards_from(board: &Board, grid: &PossibilityGrid) -> Vec<Board> {
    let mut out = Vec::new();
    for row in 0..9 {
        for col in 0..9 {
            if board.is_filled(row, col) {
                continue;
            }
            for value in grid.get(row, col).iter() {
                let mut next = *board;
                next.set(row, col, value);
                out.push(next);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str =
        "8  6 3  4    7   2 6 4  7      85     2   37    72      8  4 1 4   3    1    8 93";

    #[test]
    fn fixture_solves_to_valid_board() {
        let board = Board::from_line(FIXTURE);
        let report = Solver::new().solve(&board);
        let solved = report.solved_board().expect("fixture must solve");
        assert!(solved.is_solved());
        assert!(solved.check_puzzle());
        assert!(!report.difficulty.is_unsolvable());
        assert!(report.difficulty.tries >= 1);
    }

    #[test]
    fn solver_preserves_original_clues() {
        let board = Board::from_line(FIXTURE);
        let report = Solver::new().solve(&board);
        let solved = report.solved_board().expect("fixture must solve");
        for row in 0..9 {
            for col in 0..9 {
                if let Some(v) = board.get(row, col) {
                    assert_eq!(solved.get(row, col), Some(v), "clue at ({},{})", row, col);
                }
            }
        }
    }

    #[test]
    fn empty_board_needs_guesses_and_ends_in_defined_outcome() {
        let board = Board::from_line(&" ".repeat(81));
        let report = Solver::new().solve(&board);
        match report.outcome {
            SolveOutcome::Solved(solved) => {
                assert!(solved.check_puzzle());
                // Propagation alone cannot pin a blank board.
                assert!(report.difficulty.guess_level >= 1);
                assert!(report.difficulty.depth >= 2);
            }
            SolveOutcome::Unsolved { .. } => {
                assert!(report.difficulty.is_unsolvable());
            }
        }
    }

    #[test]
    fn inconsistent_clues_end_unsolved_not_panicking() {
        // Duplicate 8s in row 0 poison every completion.
        let mut line = String::from("88");
        line.push_str(&" ".repeat(79));
        let board = Board::from_line(&line);
        let report = Solver::with_depth_cutoff(50).solve(&board);
        assert!(report.solved_board().is_none());
        assert!(report.difficulty.is_unsolvable());
    }

    #[test]
    fn solved_input_returns_immediately() {
        let board = Board::from_line(FIXTURE);
        let solved = *Solver::new().solve(&board).solved_board().unwrap();
        let report = Solver::new().solve(&solved);
        let again = report.solved_board().unwrap();
        assert_eq!(*again, solved);
        assert_eq!(report.difficulty.guess_level, 0);
        assert_eq!(report.difficulty.tries, 0);
    }

    #[test]
    fn sieve_reaches_fixpoint_under_repeated_rounds() {
        // Drive a board with sieve-only commits until sieve goes quiet, then
        // confirm a re-run on the settled state proposes nothing new.
        let mut board = Board::from_line(FIXTURE);
        loop {
            let grid = engine::base_possibilities(&board);
            let proposals = engine::sieve(&grid);
            if proposals.is_empty() {
                break;
            }
            fill_answers(&mut board, &proposals).expect("fixture propagation is consistent");
        }
        let grid = engine::base_possibilities(&board);
        assert!(engine::sieve(&grid).is_empty());
    }

    #[test]
    fn combo_derived_commits_stay_consistent() {
        // Any proposal surviving the locked-set pipeline must keep the real
        // board valid once applied.
        let board = Board::from_line(FIXTURE);
        let base = engine::base_possibilities(&board);
        let mut merged = Vec::new();
        for kind in GroupKind::ALL {
            merged.extend(engine::comb(&engine::locked_set_transform(&base, kind)));
        }
        for p in engine::reconcile(merged) {
            let mut copy = board;
            copy.set(p.row, p.col, p.value);
            assert!(copy.check_puzzle(), "combo proposal {:?} broke the board", p);
        }
    }

    #[test]
    fn fill_answers_flags_conflicting_overwrite() {
        let mut board = Board::new();
        board.set(0, 0, 5);
        let clash = [Proposal {
            row: 0,
            col: 0,
            value: 6,
        }];
        assert!(fill_answers(&mut board, &clash).is_err());
        // The original clue survives the aborted round.
        assert_eq!(board.get(0, 0), Some(5));
    }

    #[test]
    fn fill_answers_flags_range_violation() {
        let mut board = Board::new();
        board.set(0, 0, 5);
        let bad = [Proposal {
            row: 0,
            col: 8,
            value: 5,
        }];
        assert!(fill_answers(&mut board, &bad).is_err());
    }

    #[test]
    fn fill_answers_counts_commits_and_skips_agreements() {
        let mut board = Board::new();
        board.set(0, 0, 5);
        let proposals = [
            Proposal { row: 0, col: 0, value: 5 },
            Proposal { row: 1, col: 1, value: 3 },
        ];
        assert_eq!(fill_answers(&mut board, &proposals), Ok(1));
        assert_eq!(board.get(1, 1), Some(3));
    }

    #[test]
    fn depth_cutoff_bounds_the_search() {
        let board = Board::from_line(&" ".repeat(81));
        let report = Solver::with_depth_cutoff(1).solve(&board);
        assert!(report.solved_board().is_none());
    }
}
