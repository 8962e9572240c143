use derive_more::Display;
use strum::{EnumCount, EnumIter};

/// A cell coordinate, row first.
///
/// Every grid in this crate is indexed `(row, col)` with the origin at the top-left.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[display(fmt = "({}, {})", row, col)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// `None` if the sum would overflow.
    pub fn offset_by(self, offset: Position) -> Option<Position> {
        Some(Position {
            row: self.row.checked_add(offset.row)?,
            col: self.col.checked_add(offset.col)?,
        })
    }

    pub fn up(self) -> Option<Position> {
        Some(Position::new(self.row.checked_sub(1)?, self.col))
    }

    pub fn down(self) -> Option<Position> {
        Some(Position::new(self.row.checked_add(1)?, self.col))
    }

    pub fn left(self) -> Option<Position> {
        Some(Position::new(self.row, self.col.checked_sub(1)?))
    }

    pub fn right(self) -> Option<Position> {
        Some(Position::new(self.row, self.col.checked_add(1)?))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// Clockwise quarter turns. The discriminant is the rotation index.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(EnumIter, EnumCount)]
pub enum Rotation {
    #[default]
    #[display(fmt = "0°")]
    R0 = 0,
    #[display(fmt = "90°")]
    R90 = 1,
    #[display(fmt = "180°")]
    R180 = 2,
    #[display(fmt = "270°")]
    R270 = 3,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
#[error("{0} is not a quarter turn")]
pub struct NotAQuarterTurn(pub u16);

impl Rotation {
    pub const ALL: [Rotation; Rotation::COUNT] =
        [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Wraps, so `from_index(5) == R90`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub fn degrees(self) -> u16 {
        self as u16 * 90
    }

    pub fn clockwise(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn counter_clockwise(self) -> Self {
        Self::from_index(self.index() + Self::COUNT - 1)
    }

    /// Dimensions of an `rows`x`cols` grid after this rotation.
    pub fn dims(self, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Rotation::R0 | Rotation::R180 => (rows, cols),
            Rotation::R90 | Rotation::R270 => (cols, rows),
        }
    }

    /// Where `position` of an `rows`x`cols` grid lands after this rotation.
    ///
    /// Both matrix rotation and atom rotation go through here, so a rotated
    /// block's footprint always matches its rotated matrix.
    pub fn map(self, position: Position, rows: usize, cols: usize) -> Position {
        let Position { row, col } = position;
        debug_assert!(row < rows && col < cols, "{position} outside {rows}x{cols}");
        match self {
            Rotation::R0 => position,
            Rotation::R90 => Position::new(col, rows - 1 - row),
            Rotation::R180 => Position::new(rows - 1 - row, cols - 1 - col),
            Rotation::R270 => Position::new(cols - 1 - col, row),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = NotAQuarterTurn;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees % 360 {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            _ => Err(NotAQuarterTurn(degrees)),
        }
    }
}
