//! The 9x9 board: storage, consistency checks, and the 81-character string
//! form used everywhere downstream.
//!
//! `set`/`clear` never fail and enforce nothing; validity is checked
//! explicitly through `check_puzzle`. Boards are small and `Clone` is a flat
//! copy, which the search engine leans on when branching.

use std::fmt;

use crate::candidates::{group_cells, GroupKind};

/// A 9x9 grid of cells, each empty or holding a value 1..=9.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Option<u8>; 9]; 9],
}

impl Board {
    /// An all-empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient 81-character parse: a digit 1-9 fills the cell, any other
    /// character leaves it empty, and short input pads the tail with empties.
    pub fn from_line(line: &str) -> Self {
        let mut board = Board::new();
        let mut chars = line.chars();
        for row in 0..9 {
            for col in 0..9 {
                if let Some(ch) = chars.next() {
                    if let Some(d) = ch.to_digit(10) {
                        if d >= 1 {
                            board.cells[row][col] = Some(d as u8);
                        }
                    }
                }
            }
        }
        board
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!((1..=9).contains(&value));
        self.cells[row][col] = Some(value);
    }

    pub fn clear(&mut self, row: usize, col: usize) {
        self.cells[row][col] = None;
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells[row][col]
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells[row][col].is_some()
    }

    /// All 81 cells filled. Says nothing about validity.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_some())
    }

    /// Count of filled cells; the best-first search priority.
    pub fn coverage(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// No value occurs twice among the filled cells of the given group.
    pub fn check_range(&self, cells: &[(usize, usize); 9]) -> bool {
        let mut seen = [false; 10];
        for &(row, col) in cells {
            if let Some(v) = self.cells[row][col] {
                if seen[v as usize] {
                    return false;
                }
                seen[v as usize] = true;
            }
        }
        true
    }

    /// All 9 rows, 9 columns, and 9 boxes pass `check_range`.
    pub fn check_puzzle(&self) -> bool {
        for kind in GroupKind::ALL {
            for index in 0..9 {
                if !self.check_range(&group_cells(kind, index)) {
                    return false;
                }
            }
        }
        true
    }

    /// The row, column, and box containing (row, col) are all consistent.
    pub fn check_cell_groups(&self, row: usize, col: usize) -> bool {
        self.check_range(&group_cells(GroupKind::Row, row))
            && self.check_range(&group_cells(GroupKind::Col, col))
            && self.check_range(&group_cells(GroupKind::Box, (row / 3) * 3 + col / 3))
    }

    /// Framed, human-readable rendering.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        let header = "+---+---+---+\n";
        for row in 0..9 {
            if row % 3 == 0 {
                out.push_str(header);
            }
            for col in 0..9 {
                if col % 3 == 0 {
                    out.push('|');
                }
                match self.cells[row][col] {
                    Some(v) => out.push(char::from(b'0' + v)),
                    None => out.push(' '),
                }
            }
            out.push_str("|\n");
        }
        out.push_str(header);
        out
    }
}

/// The 81-character row-major string form: digits for filled cells, spaces
/// for empty ones. Round-trips through `Board::from_line`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                match cell {
                    Some(v) => write!(f, "{}", v)?,
                    None => write!(f, " ")?,
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str =
        "8  6 3  4    7   2 6 4  7      85     2   37    72      8  4 1 4   3    1    8 93";

    #[test]
    fn string_round_trip() {
        let board = Board::from_line(FIXTURE);
        assert_eq!(board.to_string(), FIXTURE);
    }

    #[test]
    fn short_input_pads_with_empties() {
        let board = Board::from_line("123");
        assert_eq!(board.get(0, 0), Some(1));
        assert_eq!(board.get(0, 2), Some(3));
        assert_eq!(board.coverage(), 3);
        assert_eq!(board.to_string().len(), 81);
    }

    #[test]
    fn non_digits_and_zero_parse_as_empty() {
        let board = Board::from_line("0X 7.");
        assert_eq!(board.get(0, 0), None);
        assert_eq!(board.get(0, 1), None);
        assert_eq!(board.get(0, 2), None);
        assert_eq!(board.get(0, 3), Some(7));
        assert_eq!(board.get(0, 4), None);
    }

    #[test]
    fn set_clear_get() {
        let mut board = Board::new();
        board.set(4, 5, 9);
        assert!(board.is_filled(4, 5));
        assert_eq!(board.get(4, 5), Some(9));
        board.clear(4, 5);
        assert!(!board.is_filled(4, 5));
    }

    #[test]
    fn check_puzzle_catches_duplicates() {
        let mut board = Board::from_line(FIXTURE);
        assert!(board.check_puzzle());

        // (0,0) is 8; another 8 in the same row breaks it.
        board.set(0, 1, 8);
        assert!(!board.check_puzzle());
        assert!(!board.check_cell_groups(0, 1));
    }

    #[test]
    fn check_range_ignores_empty_cells() {
        let board = Board::new();
        assert!(board.check_puzzle());
        assert!(!board.is_solved());
    }

    #[test]
    fn value_equality_is_cellwise() {
        let a = Board::from_line(FIXTURE);
        let mut b = Board::from_line(FIXTURE);
        assert_eq!(a, b);
        b.set(8, 8, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn pretty_frames_the_grid() {
        let board = Board::from_line(FIXTURE);
        let pretty = board.pretty();
        assert_eq!(pretty.lines().count(), 13);
        assert!(pretty.starts_with("+---+---+---+"));
        assert!(pretty.lines().nth(1).unwrap().starts_with("|8  |"));
    }
}
