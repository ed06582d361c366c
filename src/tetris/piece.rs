//! Tetromino catalogue, shape matrices and rotation.

/// Tetromino kinds (I, O, T, S, Z, J, L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::S, Self::Z, Self::J, Self::L];

    /// Cell value this kind writes into the playfield (1..=7).
    pub const fn value(self) -> u8 {
        match self {
            Self::I => 1,
            Self::O => 2,
            Self::T => 3,
            Self::S => 4,
            Self::Z => 5,
            Self::J => 6,
            Self::L => 7,
        }
    }

    /// Inverse of [`Self::value`]; `None` for 0 and anything above 7.
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    /// Spawn orientation, row-major.
    const fn rows(self) -> &'static [&'static [u8]] {
        match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[2, 2], &[2, 2]],
            Self::T => &[&[0, 3, 0], &[3, 3, 3]],
            Self::S => &[&[0, 4, 4], &[4, 4, 0]],
            Self::Z => &[&[5, 5, 0], &[0, 5, 5]],
            Self::J => &[&[6, 0, 0], &[6, 6, 6]],
            Self::L => &[&[0, 0, 7], &[7, 7, 7]],
        }
    }

    /// Fresh owned copy of the spawn orientation.
    pub fn shape(self) -> Shape {
        Shape::from_rows(self.rows())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub const fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Rectangular matrix of cell values for one orientation of a tetromino.
/// `cells` is row-major, `width * height` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Shape {
    /// Build from equally long rows.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let width = rows.first().map_or(0, |r| r.len());
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            width,
            height: rows.len(),
            cells: rows.iter().flat_map(|r| r.iter().copied()).collect(),
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
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.cells[y * self.width + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Non-empty cells as `(dx, dy, value)` relative to the top-left corner.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &v)| {
            (v != 0).then(|| ((i % self.width) as i32, (i / self.width) as i32, v))
        })
    }

    pub fn transposed(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for x in 0..self.width {
            for y in 0..self.height {
                cells.push(self.get(x, y));
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Transpose, then mirror horizontally (clockwise) or vertically (counter-clockwise).
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut out = self.transposed();
        let w = out.width.max(1);
        match rotation {
            Rotation::Clockwise => out.cells.chunks_mut(w).for_each(<[u8]>::reverse),
            Rotation::CounterClockwise => {
                let rows: Vec<Vec<u8>> = out.cells.chunks(w).rev().map(<[u8]>::to_vec).collect();
                out.cells = rows.concat();
            }
        }
        out
    }
}

/// The falling piece: owned shape plus top-left position in playfield cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Spawn position: horizontally centred (floor division) on row 0.
    pub fn spawn(kind: TetrominoKind, playfield_width: usize) -> Self {
        let shape = kind.shape();
        let x = (playfield_width / 2) as i32 - (shape.width() / 2) as i32;
        Self { kind, shape, x, y: 0 }
    }

    /// Absolute playfield coordinates of the filled cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.shape
            .filled()
            .map(|(dx, dy, v)| (self.x + dx, self.y + dy, v))
    }
}
