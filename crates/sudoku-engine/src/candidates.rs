//! Candidate bookkeeping: 9-bit value sets, the 9x9 possibility grid, and
//! peer-group addressing.
//!
//! Sector convention follows the usual linear numbering: rows, then columns,
//! then boxes. `GroupKind` plus an index 0..9 names any of the 27 groups.

use std::fmt;

const ALL_BITS: u16 = 0x1FF;

/// Set of candidate values 1..=9, packed into the low nine bits of a `u16`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CandidateSet(u16);

impl CandidateSet {
    /// The empty set.
    pub const fn empty() -> Self {
        CandidateSet(0)
    }

    /// The full set {1..9}.
    pub const fn full() -> Self {
        CandidateSet(ALL_BITS)
    }

    /// A one-element set.
    pub fn single(value: u8) -> Self {
        debug_assert!((1..=9).contains(&value));
        CandidateSet(1 << (value - 1))
    }

    pub fn contains(self, value: u8) -> bool {
        (1..=9).contains(&value) && self.0 & (1 << (value - 1)) != 0
    }

    pub fn insert(&mut self, value: u8) {
        debug_assert!((1..=9).contains(&value));
        self.0 |= 1 << (value - 1);
    }

    pub fn remove(&mut self, value: u8) {
        if (1..=9).contains(&value) {
            self.0 &= !(1 << (value - 1));
        }
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The sole member, if the set has exactly one.
    pub fn only(self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    pub fn union(self, other: Self) -> Self {
        CandidateSet(self.0 | other.0)
    }

    pub fn intersect(self, other: Self) -> Self {
        CandidateSet(self.0 & other.0)
    }

    /// `self` minus `other`.
    pub fn difference(self, other: Self) -> Self {
        CandidateSet(self.0 & !other.0)
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=9).filter(move |&v| self.contains(v))
    }
}

impl fmt::Debug for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The three peer-group families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Row,
    Col,
    Box,
}

impl GroupKind {
    pub const ALL: [GroupKind; 3] = [GroupKind::Row, GroupKind::Col, GroupKind::Box];
}

/// The nine cell coordinates of peer-group `index` (0..9) of the given kind.
pub fn group_cells(kind: GroupKind, index: usize) -> [(usize, usize); 9] {
    debug_assert!(index < 9);
    match kind {
        GroupKind::Row => std::array::from_fn(|c| (index, c)),
        GroupKind::Col => std::array::from_fn(|r| (r, index)),
        GroupKind::Box => {
            let base_row = (index / 3) * 3;
            let base_col = (index % 3) * 3;
            std::array::from_fn(|i| (base_row + i / 3, base_col + i % 3))
        }
    }
}

/// Per-cell candidate state for one propagation round. Filled cells hold the
/// empty set; the grid is recomputed from a board snapshot each round rather
/// than maintained incrementally.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PossibilityGrid {
    cells: [[CandidateSet; 9]; 9],
}

impl PossibilityGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> CandidateSet {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, set: CandidateSet) {
        self.cells[row][col] = set;
    }

    pub fn remove(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col].remove(value);
    }

    /// Total candidate count across all cells. Zero means the grid has
    /// nothing left to offer (fully resolved or fully eliminated).
    pub fn candidate_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .map(|set| set.len())
            .sum()
    }
}

impl fmt::Debug for PossibilityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for set in row {
                write!(f, "{:?} ", set)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_basics() {
        let mut set = CandidateSet::empty();
        assert!(set.is_empty());
        set.insert(3);
        set.insert(7);
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(!set.contains(4));
        set.remove(3);
        assert_eq!(set.only(), Some(7));
    }

    #[test]
    fn full_set_has_nine_members() {
        let full = CandidateSet::full();
        assert_eq!(full.len(), 9);
        assert_eq!(full.iter().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
        assert_eq!(full.only(), None);
    }

    #[test]
    fn set_algebra() {
        let mut a = CandidateSet::empty();
        a.insert(1);
        a.insert(2);
        a.insert(5);
        let mut b = CandidateSet::empty();
        b.insert(2);
        b.insert(9);

        assert_eq!(a.union(b).len(), 4);
        assert_eq!(a.intersect(b).only(), Some(2));
        let d = a.difference(b);
        assert!(d.contains(1) && d.contains(5) && !d.contains(2));
    }

    #[test]
    fn removing_out_of_range_is_a_no_op() {
        let mut set = CandidateSet::full();
        set.remove(0);
        set.remove(10);
        assert_eq!(set, CandidateSet::full());
    }

    #[test]
    fn box_group_cells() {
        let cells = group_cells(GroupKind::Box, 4);
        assert_eq!(cells[0], (3, 3));
        assert_eq!(cells[8], (5, 5));
    }

    #[test]
    fn row_and_col_group_cells() {
        assert_eq!(group_cells(GroupKind::Row, 2)[5], (2, 5));
        assert_eq!(group_cells(GroupKind::Col, 7)[0], (0, 7));
    }

    #[test]
    fn grid_candidate_count() {
        let mut grid = PossibilityGrid::new();
        assert_eq!(grid.candidate_count(), 0);
        grid.set(0, 0, CandidateSet::full());
        grid.set(8, 8, CandidateSet::single(4));
        assert_eq!(grid.candidate_count(), 10);
        grid.remove(0, 0, 9);
        assert_eq!(grid.candidate_count(), 9);
    }
}
