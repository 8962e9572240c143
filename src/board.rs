use std::{collections::BTreeMap, fmt};

use generic_new::GenericNew;
use log::{debug, trace, warn};

use crate::{
    block::{Block, BlockColor, BlockId, BlockState},
    geometry::{Position, Rotation},
    shape::{ShapeError, ShapeMatrix},
};

/// Which array slots of a board are playable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridPreset {
    /// Every slot is legal.
    Rectangle { rows: usize, cols: usize },
    /// Set cells are legal, the rest are permanently excluded.
    Custom(ShapeMatrix),
}

impl GridPreset {
    pub fn legality_mask(&self) -> Result<ShapeMatrix, ShapeError> {
        match self {
            GridPreset::Rectangle { rows, cols } => ShapeMatrix::filled(*rows, *cols),
            GridPreset::Custom(mask) => Ok(mask.clone()),
        }
    }
}

/// Which atom of which block sits in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, GenericNew)]
pub struct Occupant {
    pub block: BlockId,
    pub atom: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    legal: bool,
    occupant: Option<Occupant>,
}

impl Cell {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_legal(&self) -> bool {
        self.legal
    }

    pub fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    /// Legal and unoccupied.
    pub fn is_vacant(&self) -> bool {
        self.legal && self.occupant.is_none()
    }
}

/// What the board remembers about a block it holds.
#[derive(Debug, Clone, PartialEq, Eq, GenericNew)]
pub struct PlacedBlock {
    pub id: BlockId,
    pub color: BlockColor,
    pub state: BlockState,
    /// Indexed by atom.
    pub cells: Vec<Position>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum PlacementRejected {
    #[error("block {0} is already on the board")]
    AlreadyPlaced(BlockId),
    #[error("cell {0} is outside the board")]
    OutOfBounds(Position),
    #[error("cell {0} is not part of the board")]
    Illegal(Position),
    #[error("cell {0} is occupied by block {1}")]
    Occupied(Position, BlockId),
}

/// Cell occupancy and the blocks behind it.
///
/// The board is the only owner of cell state: callers mutate it through
/// [`try_place`](Board::try_place), [`remove`](Board::remove) and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    legality: ShapeMatrix,
    // row-major, same layout as `legality`
    cells: Vec<Cell>,
    blocks: BTreeMap<BlockId, PlacedBlock>,
}

/// The four edge-sharing neighbours of a cell. Out of bounds and illegal
/// neighbours are `None`.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    pub up: Option<&'a Cell>,
    pub down: Option<&'a Cell>,
    pub left: Option<&'a Cell>,
    pub right: Option<&'a Cell>,
}

impl<'a> Neighbors<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> {
        [self.up, self.down, self.left, self.right].into_iter().flatten()
    }
}

impl Board {
    pub fn new(preset: &GridPreset) -> Result<Self, ShapeError> {
        let legality = preset.legality_mask()?;
        let cells = legality
            .positions()
            .map(|position| Cell {
                position,
                legal: legality.is_set(position),
                occupant: None,
            })
            .collect();
        Ok(Self {
            legality,
            cells,
            blocks: BTreeMap::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.legality.rows()
    }

    pub fn cols(&self) -> usize {
        self.legality.cols()
    }

    pub fn legality(&self) -> &ShapeMatrix {
        &self.legality
    }

    fn index(&self, Position { row, col }: Position) -> Option<usize> {
        (row < self.rows() && col < self.cols()).then(|| row * self.cols() + col)
    }

    /// `None` out of bounds. Illegal cells are returned, check [`Cell::is_legal`].
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|ix| &self.cells[ix])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn block(&self, id: BlockId) -> Option<&PlacedBlock> {
        self.blocks.get(&id)
    }

    /// In id order.
    pub fn blocks(&self) -> impl Iterator<Item = &PlacedBlock> {
        self.blocks.values()
    }

    pub fn block_at(&self, position: Position) -> Option<&PlacedBlock> {
        let occupant = self.cell(position)?.occupant?;
        self.blocks.get(&occupant.block)
    }

    /// What [`try_place`](Self::try_place) would do, without doing it.
    pub fn check_placement(
        &self,
        block: &Block,
        rotation: Rotation,
        anchor: Position,
    ) -> Result<Vec<(usize, Position)>, PlacementRejected> {
        if self.blocks.contains_key(&block.id()) {
            return Err(PlacementRejected::AlreadyPlaced(block.id()));
        }
        block
            .footprint(rotation, anchor)
            .map(|(atom, target)| {
                let target = target.ok_or(PlacementRejected::OutOfBounds(anchor))?;
                let cell = self
                    .cell(target)
                    .ok_or(PlacementRejected::OutOfBounds(target))?;
                if !cell.legal {
                    return Err(PlacementRejected::Illegal(target));
                }
                if let Some(occupant) = cell.occupant {
                    return Err(PlacementRejected::Occupied(target, occupant.block));
                }
                Ok((atom, target))
            })
            .collect()
    }

    /// Put `block`, rotated, with its top-left at `anchor`. Nothing changes on
    /// rejection.
    pub fn try_place(
        &mut self,
        block: &Block,
        rotation: Rotation,
        anchor: Position,
    ) -> Result<(), PlacementRejected> {
        let footprint = self.check_placement(block, rotation, anchor)?;
        let mut cells = vec![Position::ORIGIN; footprint.len()];
        for (atom, target) in footprint {
            if let Some(ix) = self.index(target) {
                self.cells[ix].occupant = Some(Occupant::new(block.id(), atom));
            }
            cells[atom] = target;
        }
        debug!(
            "placed {} {} at {anchor} rotated {rotation}",
            block.color(),
            block.id()
        );
        self.blocks.insert(
            block.id(),
            PlacedBlock::new(block.id(), block.color(), block.state(), cells),
        );
        Ok(())
    }

    /// Clear every cell held by `id`. A no-op for blocks not on the board.
    pub fn remove(&mut self, id: BlockId) -> Option<PlacedBlock> {
        let removed = self.blocks.remove(&id)?;
        for position in &removed.cells {
            if let Some(ix) = self.index(*position) {
                let cell = &mut self.cells[ix];
                if cell.occupant.map(|occupant| occupant.block) == Some(id) {
                    cell.occupant = None;
                }
            }
        }
        debug!("removed {id}");
        Some(removed)
    }

    /// Remove every block, returning them in id order.
    pub fn clear(&mut self) -> Vec<PlacedBlock> {
        let ids = self.blocks.keys().copied().collect::<Vec<_>>();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Remove every block of `color`, whatever its state.
    pub fn remove_color(&mut self, color: BlockColor) -> Vec<PlacedBlock> {
        let ids = self
            .blocks
            .values()
            .filter(|block| block.color == color)
            .map(|block| block.id)
            .collect::<Vec<_>>();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Returns the previous colour, `None` if `id` isn't on the board.
    pub fn recolor(&mut self, id: BlockId, color: BlockColor) -> Option<BlockColor> {
        let Some(block) = self.blocks.get_mut(&id) else {
            warn!("can't recolor {id}, it isn't on the board");
            return None;
        };
        Some(std::mem::replace(&mut block.color, color))
    }

    /// Returns the previous state, `None` if `id` isn't on the board.
    pub fn set_state(&mut self, id: BlockId, state: BlockState) -> Option<BlockState> {
        let Some(block) = self.blocks.get_mut(&id) else {
            warn!("can't set state of {id}, it isn't on the board");
            return None;
        };
        Some(std::mem::replace(&mut block.state, state))
    }

    /// Set for every legal, unoccupied cell. Recomputed on every call.
    pub fn vacancy_mask(&self) -> ShapeMatrix {
        let mask = self
            .legality
            .map_positions(|position| self.cell(position).map_or(false, Cell::is_vacant));
        trace!("vacancy:\n{mask}");
        mask
    }

    pub fn neighbors_of(&self, position: Position) -> Neighbors<'_> {
        let legal = |position: Option<Position>| {
            position
                .and_then(|position| self.cell(position))
                .filter(|cell| cell.legal)
        };
        Neighbors {
            up: legal(position.up()),
            down: legal(position.down()),
            left: legal(position.left()),
            right: legal(position.right()),
        }
    }

    /// No cell is occupied.
    pub fn is_fully_vacant(&self) -> bool {
        self.cells.iter().all(|cell| cell.occupant.is_none())
    }

    /// No legal cell is vacant: the "fit me" condition.
    pub fn is_fully_occupied(&self) -> bool {
        !self.cells.iter().any(Cell::is_vacant)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols()) {
            for cell in row {
                let glyph = match (cell.legal, cell.occupant) {
                    (false, _) => '-',
                    (true, None) => '.',
                    (true, Some(occupant)) => match self.blocks.get(&occupant.block) {
                        Some(block) if block.state == BlockState::Normal => block.color.glyph(),
                        Some(block) => block.color.glyph().to_ascii_lowercase(),
                        None => '?',
                    },
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{block::BlockFace, shape};

    fn rectangle(rows: usize, cols: usize) -> Board {
        Board::new(&GridPreset::Rectangle { rows, cols }).unwrap()
    }

    fn block(id: u32, color: BlockColor, face: BlockFace) -> Block {
        Block::from_face(BlockId::new(id), color, face).unwrap()
    }

    #[test]
    fn huge_rectangle_is_rejected() {
        assert_eq!(
            Board::new(&GridPreset::Rectangle {
                rows: usize::MAX,
                cols: usize::MAX
            }),
            Err(ShapeError::TooLarge {
                rows: usize::MAX,
                cols: usize::MAX
            })
        );
    }

    #[test]
    fn zero_sized_board_is_malformed() {
        assert_eq!(
            Board::new(&GridPreset::Rectangle { rows: 0, cols: 3 }),
            Err(ShapeError::ZeroDimension { rows: 0, cols: 3 })
        );
    }

    #[test]
    fn custom_preset_excludes_illegal_cells() -> anyhow::Result<()> {
        let board = Board::new(&GridPreset::Custom(shape![
            [# # .],
            [. # #],
        ]))?;
        assert_eq!(
            board.vacancy_mask(),
            shape![
                [# # .],
                [. # #],
            ]
        );
        assert!(!board.cell(Position::new(0, 2)).unwrap().is_legal());
        assert_eq!(board.to_string(), "..-\n-..\n");
        Ok(())
    }

    #[test]
    fn place_marks_cells() -> anyhow::Result<()> {
        let mut board = rectangle(3, 3);
        board.try_place(
            &block(1, BlockColor::Red, BlockFace::L),
            Rotation::R90,
            Position::new(1, 0),
        )?;
        assert_eq!(
            board.vacancy_mask(),
            shape![
                [# # #],
                [. . .],
                [. # #],
            ]
        );
        assert_eq!(
            board.cell(Position::new(2, 0)).unwrap().occupant(),
            Some(Occupant::new(BlockId::new(1), 3usize))
        );
        assert_eq!(board.to_string(), "...\nRRR\nR..\n");
        Ok(())
    }

    #[test]
    fn rejections_leave_board_untouched() -> anyhow::Result<()> {
        let mut board = Board::new(&GridPreset::Custom(shape![
            [# # #],
            [# # .],
        ]))?;
        let i2 = block(1, BlockColor::Red, BlockFace::I2);
        let before = board.clone();
        assert_eq!(
            board.try_place(&i2, Rotation::R0, Position::new(0, 2)),
            Err(PlacementRejected::Illegal(Position::new(1, 2)))
        );
        assert_eq!(
            board.try_place(&i2, Rotation::R0, Position::new(1, 0)),
            Err(PlacementRejected::OutOfBounds(Position::new(2, 0)))
        );
        assert_eq!(board, before);

        board.try_place(&i2, Rotation::R90, Position::new(0, 0))?;
        assert_eq!(
            board.try_place(&i2, Rotation::R0, Position::new(0, 2)),
            Err(PlacementRejected::AlreadyPlaced(BlockId::new(1)))
        );
        assert_eq!(
            board.try_place(
                &block(2, BlockColor::Red, BlockFace::I1),
                Rotation::R0,
                Position::new(0, 1)
            ),
            Err(PlacementRejected::Occupied(
                Position::new(0, 1),
                BlockId::new(1)
            ))
        );
        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> anyhow::Result<()> {
        let mut board = rectangle(2, 2);
        let empty = board.vacancy_mask();
        board.try_place(
            &block(4, BlockColor::Yellow, BlockFace::I2),
            Rotation::R0,
            Position::ORIGIN,
        )?;
        assert!(board.remove(BlockId::new(4)).is_some());
        assert_eq!(board.remove(BlockId::new(4)), None);
        assert_eq!(board.vacancy_mask(), empty);
        assert!(board.is_fully_vacant());
        Ok(())
    }

    #[test]
    fn neighbours_skip_illegal_and_edges() -> anyhow::Result<()> {
        let board = Board::new(&GridPreset::Custom(shape![
            [# .],
            [# #],
        ]))?;
        let neighbors = board.neighbors_of(Position::ORIGIN);
        assert!(neighbors.up.is_none());
        assert!(neighbors.left.is_none());
        assert!(neighbors.right.is_none());
        assert_eq!(
            neighbors.down.map(Cell::position),
            Some(Position::new(1, 0))
        );
        assert_eq!(neighbors.iter().count(), 1);
        Ok(())
    }

    #[test]
    fn fully_occupied_ignores_illegal_cells() -> anyhow::Result<()> {
        let mut board = Board::new(&GridPreset::Custom(shape![
            [# #],
            [. .],
        ]))?;
        assert!(!board.is_fully_occupied());
        board.try_place(
            &block(1, BlockColor::Green, BlockFace::I2),
            Rotation::R90,
            Position::ORIGIN,
        )?;
        assert!(board.is_fully_occupied());
        assert!(board.vacancy_mask().is_blank());
        Ok(())
    }

    #[test]
    fn placed_copy_tracks_effects() -> anyhow::Result<()> {
        let mut board = rectangle(1, 2);
        let spawned = block(1, BlockColor::Yellow, BlockFace::I1);
        board.try_place(&spawned, Rotation::R0, Position::ORIGIN)?;
        board.recolor(spawned.id(), BlockColor::Green);
        board.set_state(spawned.id(), BlockState::PreInfected);

        let placed = board.block(spawned.id()).unwrap();
        assert_eq!(
            (placed.color, placed.state),
            (BlockColor::Green, BlockState::PreInfected)
        );
        assert_eq!(
            (spawned.color(), spawned.state()),
            (BlockColor::Yellow, BlockState::Normal)
        );
        Ok(())
    }

    #[test]
    fn item_effects() -> anyhow::Result<()> {
        let mut board = rectangle(2, 3);
        let dots = [
            (1, BlockColor::Red, Position::new(0, 0)),
            (2, BlockColor::Green, Position::new(0, 1)),
            (3, BlockColor::Red, Position::new(1, 2)),
        ];
        for (id, color, anchor) in dots {
            board.try_place(&block(id, color, BlockFace::I1), Rotation::R0, anchor)?;
        }

        assert_eq!(
            board.recolor(BlockId::new(2), BlockColor::Purple),
            Some(BlockColor::Green)
        );
        assert_eq!(
            board.set_state(BlockId::new(3), BlockState::Infected),
            Some(BlockState::Normal)
        );
        assert_eq!(board.to_string(), "RP.\n..r\n");

        let removed = board.remove_color(BlockColor::Red);
        assert_eq!(
            removed.iter().map(|block| block.id).collect::<Vec<_>>(),
            [BlockId::new(1), BlockId::new(3)]
        );
        assert_eq!(board.clear().len(), 1);
        assert!(board.is_fully_vacant());
        assert_eq!(board.recolor(BlockId::new(2), BlockColor::Red), None);
        Ok(())
    }
}
