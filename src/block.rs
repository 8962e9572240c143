use derive_more::{Display, From, Into};
use serde::Deserialize;
use strum::{EnumIter, EnumString};

use crate::{
    catalog::{normalize_atoms, ShapeCatalog},
    geometry::{Position, Rotation},
    shape::{ShapeError, ShapeMatrix},
};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[display(fmt = "#{}", _0)]
pub struct BlockId(u32);

impl BlockId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// The matching key.
#[derive(Debug, Display, EnumString, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Yellow,
    Green,
    Purple,
}

impl BlockColor {
    pub fn glyph(self) -> char {
        match self {
            BlockColor::Red => 'R',
            BlockColor::Yellow => 'Y',
            BlockColor::Green => 'G',
            BlockColor::Purple => 'P',
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockState {
    #[default]
    Normal,
    /// About to turn [`Infected`](BlockState::Infected), still matchable.
    PreInfected,
    Infected,
}

impl BlockState {
    /// Infected blocks neither start nor carry a match.
    pub fn is_matchable(self) -> bool {
        !matches!(self, BlockState::Infected)
    }

    pub fn is_infectious(self) -> bool {
        matches!(self, BlockState::PreInfected | BlockState::Infected)
    }
}

/// The stock block layouts.
#[derive(Debug, Display, EnumString, EnumIter, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFace {
    I1,
    I2,
    I3,
    I4,
    S,
    SMirror,
    L,
    LMirror,
    T,
    TwoByTwo,
}

impl BlockFace {
    /// `(row, col)` of each atom.
    pub fn atoms(self) -> &'static [(i32, i32)] {
        match self {
            BlockFace::I1 => &[(0, 0)],
            BlockFace::I2 => &[(0, 0), (1, 0)],
            BlockFace::I3 => &[(0, 0), (1, 0), (2, 0)],
            BlockFace::I4 => &[(0, 0), (1, 0), (2, 0), (3, 0)],
            BlockFace::S => &[(0, 1), (0, 2), (1, 0), (1, 1)],
            BlockFace::SMirror => &[(0, 0), (0, 1), (1, 1), (1, 2)],
            BlockFace::L => &[(0, 0), (1, 0), (2, 0), (2, 1)],
            BlockFace::LMirror => &[(0, 1), (1, 1), (2, 1), (2, 0)],
            BlockFace::T => &[(0, 0), (0, 1), (0, 2), (1, 1)],
            BlockFace::TwoByTwo => &[(0, 0), (0, 1), (1, 0), (1, 1)],
        }
    }
}

/// A piece: identity, colour, state, and a fixed atom layout with its rotations.
///
/// Colour and state are the values the piece spawns with. Once placed, the
/// [`Board`](crate::Board) keeps its own copy in [`PlacedBlock`](crate::PlacedBlock),
/// and item or infection effects only change that copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    color: BlockColor,
    state: BlockState,
    atoms: Vec<Position>,
    catalog: ShapeCatalog,
}

impl Block {
    /// Fails on an empty or self-overlapping layout.
    pub fn new(
        id: BlockId,
        color: BlockColor,
        atoms: impl IntoIterator<Item = (i32, i32)>,
    ) -> Result<Self, ShapeError> {
        let atoms = normalize_atoms(atoms)?;
        let catalog = ShapeCatalog::rasterize(&atoms)?;
        Ok(Self {
            id,
            color,
            state: BlockState::Normal,
            atoms,
            catalog,
        })
    }

    pub fn from_face(id: BlockId, color: BlockColor, face: BlockFace) -> Result<Self, ShapeError> {
        Self::new(id, color, face.atoms().iter().copied())
    }

    pub fn with_state(mut self, state: BlockState) -> Self {
        self.state = state;
        self
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Colour at spawn, see [`Board::block`](crate::Board::block) for a placed block.
    pub fn color(&self) -> BlockColor {
        self.color
    }

    /// State at spawn, see [`Board::block`](crate::Board::block) for a placed block.
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Normalized, in construction order.
    pub fn atoms(&self) -> &[Position] {
        &self.atoms
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn shape(&self, rotation: Rotation) -> &ShapeMatrix {
        self.catalog.shape(rotation)
    }

    /// `(atom index, board cell)` for each atom when the rotated shape's
    /// top-left sits at `anchor`. `None` for a cell past `usize::MAX`.
    pub fn footprint(
        &self,
        rotation: Rotation,
        anchor: Position,
    ) -> impl Iterator<Item = (usize, Option<Position>)> + '_ {
        let base = self.catalog.base();
        let (rows, cols) = (base.rows(), base.cols());
        self.atoms.iter().enumerate().map(move |(atom, position)| {
            (atom, rotation.map(*position, rows, cols).offset_by(anchor))
        })
    }
}
