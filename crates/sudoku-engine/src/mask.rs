//! Cell-visibility masks: which cells of a finished solution stay visible in
//! the published puzzle.
//!
//! A mask is built once per generation attempt with an injected RNG and then
//! only answers `show`. The builder keeps requesting fresh masks until the
//! solver can re-derive the solution from the visible cells.

use rand::Rng;

/// Visibility decision for one generated solution.
pub trait PuzzleMask {
    fn show(&self, row: usize, col: usize) -> bool;
}

/// Every cell shown independently with probability `ratio`/100.
#[derive(Debug, Clone)]
pub struct RatioMask {
    shown: [[bool; 9]; 9],
}

impl RatioMask {
    pub fn new<R: Rng>(ratio: u32, rng: &mut R) -> Self {
        let mut shown = [[false; 9]; 9];
        for row in shown.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.gen_range(0..100) < ratio;
            }
        }
        Self { shown }
    }
}

impl PuzzleMask for RatioMask {
    fn show(&self, row: usize, col: usize) -> bool {
        self.shown[row][col]
    }
}

/// Alternating four-shown/two-shown rows, shuffled independently within each
/// row, for 28 visible cells in quadrant-ish clumps.
#[derive(Debug, Clone)]
pub struct QuadrantMask {
    shown: [[bool; 9]; 9],
}

impl QuadrantMask {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut shown = [[false; 9]; 9];
        for (row_index, row) in shown.iter_mut().enumerate() {
            let visible = if row_index % 2 == 0 { 4 } else { 2 };
            for cell in row.iter_mut().take(visible) {
                *cell = true;
            }
            shuffle(row, rng);
        }
        Self { shown }
    }
}

impl PuzzleMask for QuadrantMask {
    fn show(&self, row: usize, col: usize) -> bool {
        self.shown[row][col]
    }
}

/// Exactly `count` cells shown, positions shuffled across the whole board.
#[derive(Debug, Clone)]
pub struct ShuffledCountMask {
    shown: [bool; 81],
}

impl ShuffledCountMask {
    pub fn new<R: Rng>(count: usize, rng: &mut R) -> Self {
        let mut shown = [false; 81];
        for cell in shown.iter_mut().take(count.min(81)) {
            *cell = true;
        }
        shuffle(&mut shown, rng);
        Self { shown }
    }
}

impl PuzzleMask for ShuffledCountMask {
    fn show(&self, row: usize, col: usize) -> bool {
        self.shown[row * 9 + col]
    }
}

/// Fisher-Yates.
fn shuffle<R: Rng>(cells: &mut [bool], rng: &mut R) {
    for i in (1..cells.len()).rev() {
        let j = rng.gen_range(0..=i);
        cells.swap(i, j);
    }
}
