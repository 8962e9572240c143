use std::fmt;

use crate::geometry::{Position, Rotation};

/// An immutable occupancy grid, at least 1x1.
///
/// Used both as a block's atom layout (set = atom) and as a board's vacancy
/// mask (set = legal and unoccupied).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ShapeError {
    #[error("a shape must be at least 1x1, not {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell {position} is outside a {rows}x{cols} shape")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },
    #[error("a {rows}x{cols} shape has more than {max} cells", max = MAX_CELLS)]
    TooLarge { rows: usize, cols: usize },
    #[error("a block needs at least one atom")]
    NoAtoms,
    #[error("atom at row {0}, column {1} appears more than once")]
    DuplicateAtom(i32, i32),
}

/// Upper bound on `rows * cols` for any shape or board.
pub const MAX_CELLS: usize = 1 << 20;

fn cell_count(rows: usize, cols: usize) -> Result<usize, ShapeError> {
    if rows == 0 || cols == 0 {
        return Err(ShapeError::ZeroDimension { rows, cols });
    }
    rows.checked_mul(cols)
        .filter(|cells| *cells <= MAX_CELLS)
        .ok_or(ShapeError::TooLarge { rows, cols })
}

impl ShapeMatrix {
    /// All cells clear.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ShapeError> {
        let cells = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![false; cells],
        })
    }

    /// All cells set.
    pub fn filled(rows: usize, cols: usize) -> Result<Self, ShapeError> {
        let mut shape = Self::new(rows, cols)?;
        shape.cells.fill(true);
        Ok(shape)
    }

    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, ShapeError>
    where
        R: IntoIterator<Item = bool>,
    {
        let mut cells = Vec::new();
        let mut n_rows = 0;
        let mut n_cols = None;
        for (row_n, row) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(row);
            let found = cells.len() - before;
            match n_cols {
                None => n_cols = Some(found),
                Some(expected) if expected != found => {
                    return Err(ShapeError::Ragged {
                        row: row_n,
                        expected,
                        found,
                    })
                }
                Some(_) => (),
            }
            n_rows += 1;
        }
        let n_cols = n_cols.unwrap_or(0);
        cell_count(n_rows, n_cols)?;
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            cells,
        })
    }

    /// A `rows`x`cols` shape with exactly `set` cells set.
    pub fn from_cells(
        rows: usize,
        cols: usize,
        set: impl IntoIterator<Item = Position>,
    ) -> Result<Self, ShapeError> {
        let mut shape = Self::new(rows, cols)?;
        for position in set {
            let ix = shape
                .index(position)
                .ok_or(ShapeError::OutOfBounds {
                    position,
                    rows,
                    cols,
                })?;
            shape.cells[ix] = true;
        }
        Ok(shape)
    }

    /// Same dimensions as `self`, cell values from `f`.
    pub(crate) fn map_positions(&self, mut f: impl FnMut(Position) -> bool) -> Self {
        let cells = self.positions().map(&mut f).collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, Position { row, col }: Position) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// `None` outside the shape.
    pub fn get(&self, position: Position) -> Option<bool> {
        self.index(position).map(|ix| self.cells[ix])
    }

    pub fn is_set(&self, position: Position) -> bool {
        self.get(position).unwrap_or(false)
    }

    /// Every position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |ix| Position::new(ix / cols, ix % cols))
    }

    /// Set positions, row-major.
    pub fn iter_set(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|position| self.is_set(*position))
    }

    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// No cell is set.
    pub fn is_blank(&self) -> bool {
        !self.cells.contains(&true)
    }

    pub fn rotated(&self, rotation: Rotation) -> Self {
        let (rows, cols) = rotation.dims(self.rows, self.cols);
        let mut result = Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        };
        for position in self.iter_set() {
            let target = rotation.map(position, self.rows, self.cols);
            result.cells[target.row * cols + target.col] = true;
        }
        result
    }

    pub fn rotate90(&self) -> Self {
        self.rotated(Rotation::R90)
    }

    pub fn rotate180(&self) -> Self {
        self.rotated(Rotation::R180)
    }

    pub fn rotate270(&self) -> Self {
        self.rotated(Rotation::R270)
    }

    /// Whether every set cell of `shape`, with its top-left at `offset`, lands
    /// on a set cell of `self`. Clear cells of `shape` are don't-care.
    pub fn fits(&self, shape: &ShapeMatrix, offset: Position) -> bool {
        let fits_inside = |start: usize, len: usize, bound: usize| {
            start.checked_add(len).map_or(false, |end| end <= bound)
        };
        fits_inside(offset.row, shape.rows, self.rows)
            && fits_inside(offset.col, shape.cols, self.cols)
            && shape.iter_set().all(|position| {
                position
                    .offset_by(offset)
                    .map(|target| self.is_set(target))
                    .unwrap_or(false)
            })
    }

    /// The first offset, row-major from the top-left, where `shape` fits.
    pub fn find_fit(&self, shape: &ShapeMatrix) -> Option<Position> {
        if shape.rows > self.rows || shape.cols > self.cols {
            return None;
        }
        (0..=self.rows - shape.rows)
            .flat_map(|row| (0..=self.cols - shape.cols).map(move |col| Position::new(row, col)))
            .find(|offset| self.fits(shape, *offset))
    }

    /// A copy of `self` with the set cells of `shape` cleared at `offset`, or
    /// `None` if it doesn't fit. `self` is untouched.
    pub fn consume(&self, shape: &ShapeMatrix, offset: Position) -> Option<Self> {
        if !self.fits(shape, offset) {
            return None;
        }
        let mut result = self.clone();
        for position in shape.iter_set() {
            let ix = position.offset_by(offset).and_then(|target| result.index(target))?;
            result.cells[ix] = false;
        }
        Some(result)
    }

    /// [`find_fit`](Self::find_fit) then [`consume`](Self::consume).
    pub fn consume_first_fit(&self, shape: &ShapeMatrix) -> Option<(Position, Self)> {
        let offset = self.find_fit(shape)?;
        self.consume(shape, offset).map(|consumed| (offset, consumed))
    }
}

impl fmt::Display for ShapeMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                f.write_str(if *cell { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShapeMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ShapeMatrix {}x{}", self.rows, self.cols)?;
        fmt::Display::fmt(self, f)
    }
}

/// A [`ShapeMatrix`] literal, `#` for set and `.` for clear.
///
/// # Panics
/// - If the rows are ragged or empty
#[macro_export]
macro_rules! shape {
    ($([$($cell:tt)*]),* $(,)?) => {
        $crate::ShapeMatrix::from_rows(
            [ // begin shape
                $(::std::vec![ // begin row
                    $(
                        $crate::shape!(@cell $cell),
                    )*
                ]),* // end row
            ] // end shape
        )
        .expect("shape! literal must be rectangular and at least 1x1")
    };
    (@cell #) => {
        true
    };
    (@cell .) => {
        false
    };
}
