//! Playfield: settled blocks, collision, merge and row sweep.

use super::piece::Piece;
use std::collections::VecDeque;
use std::ops::Range;

/// Default playfield size in cells.
pub const ARENA_WIDTH: usize = 12;
pub const ARENA_HEIGHT: usize = 20;

pub const EMPTY: u8 = 0;

/// Points for the first row of a sweep; each further row in the same sweep doubles.
const ROW_POINTS: u32 = 10;

/// Result of one [`Playfield::sweep`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sweep {
    /// Indices the cleared rows had before the sweep, in clearing order (bottom first).
    pub rows: Vec<usize>,
    pub points: u32,
}

impl Sweep {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Post-sweep rows where the stack closed up: the `count` rows ending at the
    /// deepest cleared row. Empty when nothing was cleared.
    pub fn settled_rows(&self) -> Range<usize> {
        match self.rows.first() {
            Some(&deepest) => deepest + 1 - self.count()..deepest + 1,
            None => 0..0,
        }
    }
}

/// Grid of settled cell values. y=0 is top; rows are stored [0..height].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<u8>>,
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Playfield {
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            rows: (0..height).map(|_| vec![EMPTY; width]).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = value;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|&v| v == EMPTY)
    }

    /// True if any filled cell of `piece` is left/right of the walls, below the floor,
    /// or on a settled cell. Cells above the top row never collide.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y, _)| {
            if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                return true;
            }
            if y < 0 {
                return false;
            }
            self.rows[y as usize][x as usize] != EMPTY
        })
    }

    /// Write the piece's filled cells into the grid. Does not check for collision;
    /// cells above the top row are dropped.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y, value) in piece.cells() {
            if x >= 0 && y >= 0 {
                self.set(x as usize, y as usize, value);
            }
        }
    }

    fn is_row_complete(&self, y: usize) -> bool {
        self.rows[y].iter().all(|&v| v != EMPTY)
    }

    /// Remove complete rows scanning bottom to top. The n-th row removed in one call
    /// scores `10 * 2^(n-1)`. After a removal the same index is examined again since
    /// it now holds the row from above.
    pub fn sweep(&mut self) -> Sweep {
        let mut sweep = Sweep::default();
        let mut multiplier = 1u32;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if !self.is_row_complete(row) {
                y -= 1;
                continue;
            }
            self.rows.remove(row);
            self.rows.push_front(vec![EMPTY; self.width]);
            // Every earlier removal sat at or below `row` and pulled this row down by one.
            sweep.rows.push(row - sweep.rows.len());
            sweep.points = sweep.points.saturating_add(multiplier.saturating_mul(ROW_POINTS));
            multiplier = multiplier.saturating_mul(2);
        }
        sweep
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(EMPTY);
        }
    }
}
