//! Constraint propagation: candidate derivation and the elimination
//! strategies the search engine composes into rounds.
//!
//! Every function here is deterministic and pure with respect to its input
//! grid; randomness never enters propagation. Strategies return proposals or
//! a narrowed grid, and committing values is left entirely to the caller.

use std::collections::HashMap;

use crate::board::Board;
use crate::candidates::{group_cells, CandidateSet, GroupKind, PossibilityGrid};

/// A single-cell assignment proposed by a strategy, not yet committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

/// Per-cell candidates from a board snapshot: the full set minus every value
/// already present among the cell's row, column, and box peers. Filled cells
/// get the empty set.
pub fn base_possibilities(board: &Board) -> PossibilityGrid {
    let mut grid = PossibilityGrid::new();
    for row in 0..9 {
        for col in 0..9 {
            if board.is_filled(row, col) {
                continue;
            }
            let mut cands = CandidateSet::full();
            for i in 0..9 {
                if let Some(v) = board.get(row, i) {
                    cands.remove(v);
                }
                if let Some(v) = board.get(i, col) {
                    cands.remove(v);
                }
            }
            let base_row = (row / 3) * 3;
            let base_col = (col / 3) * 3;
            for r in base_row..base_row + 3 {
                for c in base_col..base_col + 3 {
                    if let Some(v) = board.get(r, c) {
                        cands.remove(v);
                    }
                }
            }
            grid.set(row, col, cands);
        }
    }
    grid
}

/// Naked singles. Scans each of the 27 groups: a one-candidate cell becomes
/// a proposal and its value is struck from the rest of the group, re-scanning
/// until a full pass over the group finds nothing new. Groups share the
/// working grid, so later groups see the already-reduced candidates.
pub fn sieve(grid: &PossibilityGrid) -> Vec<Proposal> {
    let mut work = grid.clone();
    let mut found = Vec::new();
    for kind in GroupKind::ALL {
        for index in 0..9 {
            let cells = group_cells(kind, index);
            loop {
                let mut advanced = false;
                for &(row, col) in &cells {
                    if let Some(value) = work.get(row, col).only() {
                        found.push(Proposal { row, col, value });
                        work.set(row, col, CandidateSet::empty());
                        for &(r, c) in &cells {
                            work.remove(r, c, value);
                        }
                        advanced = true;
                    }
                }
                if !advanced {
                    break;
                }
            }
        }
    }
    reconcile(found)
}

/// Hidden singles, union-then-subtract form: a value absent from every other
/// cell's candidates in a group must land in the remaining cell, even when
/// that cell still has other candidates of its own.
pub fn comb(grid: &PossibilityGrid) -> Vec<Proposal> {
    let mut found = Vec::new();
    for kind in GroupKind::ALL {
        for index in 0..9 {
            let cells = group_cells(kind, index);
            for (i, &(row, col)) in cells.iter().enumerate() {
                let own = grid.get(row, col);
                if own.is_empty() {
                    continue;
                }
                let mut others = CandidateSet::empty();
                for (j, &(r, c)) in cells.iter().enumerate() {
                    if j != i {
                        others = others.union(grid.get(r, c));
                    }
                }
                if let Some(value) = own.difference(others).only() {
                    found.push(Proposal { row, col, value });
                }
            }
        }
    }
    reconcile(found)
}

/// The grid-valued form of `comb` for one group family: each cell's set is
/// replaced by the values only it can supply to its group.
pub fn comb_transform(grid: &PossibilityGrid, kind: GroupKind) -> PossibilityGrid {
    let mut out = PossibilityGrid::new();
    for index in 0..9 {
        let cells = group_cells(kind, index);
        for (i, &(row, col)) in cells.iter().enumerate() {
            let own = grid.get(row, col);
            if own.is_empty() {
                continue;
            }
            let mut others = CandidateSet::empty();
            for (j, &(r, c)) in cells.iter().enumerate() {
                if j != i {
                    others = others.union(grid.get(r, c));
                }
            }
            out.set(row, col, own.difference(others));
        }
    }
    out
}

/// Locked-set (combo) elimination for one group family: a size-k candidate
/// set shared by exactly k cells of a group must occupy those cells, so its
/// values are struck from every cell of the group. Member cells end up empty,
/// provisionally resolved in this derived view only. Narrows candidates;
/// never commits a value.
pub fn locked_set_transform(grid: &PossibilityGrid, kind: GroupKind) -> PossibilityGrid {
    let mut out = grid.clone();
    for index in 0..9 {
        let cells = group_cells(kind, index);
        let mut tally: HashMap<CandidateSet, usize> = HashMap::new();
        for &(row, col) in &cells {
            let set = grid.get(row, col);
            if !set.is_empty() {
                *tally.entry(set).or_insert(0) += 1;
            }
        }
        for (set, count) in tally {
            if set.len() == count {
                for &(row, col) in &cells {
                    let narrowed = out.get(row, col).difference(set);
                    out.set(row, col, narrowed);
                }
            }
        }
    }
    out
}

/// Collapse duplicate proposals and cancel contradictory pairs: two
/// proposals at the same cell with different values drop each other within
/// the same round. Output is sorted for determinism.
pub(crate) fn reconcile(proposals: Vec<Proposal>) -> Vec<Proposal> {
    let mut chosen: HashMap<(usize, usize), Option<u8>> = HashMap::new();
    for p in &proposals {
        chosen
            .entry((p.row, p.col))
            .and_modify(|slot| {
                if *slot != Some(p.value) {
                    *slot = None;
                }
            })
            .or_insert(Some(p.value));
    }
    let mut out: Vec<Proposal> = chosen
        .into_iter()
        .filter_map(|((row, col), slot)| slot.map(|value| Proposal { row, col, value }))
        .collect();
    out.sort_by_key(|p| (p.row, p.col));
    out
}
