use log::{debug, info};
use tap::Tap;

use crate::{
    block::{Block, BlockId},
    board::{Board, PlacedBlock, PlacementRejected},
    config::EngineConfig,
    geometry::{Position, Rotation},
    matching::{MatchResolver, MatchResult},
};

/// A committed placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub block: BlockId,
    /// The group around the placed block, destructive or not.
    pub matched: MatchResult,
    /// Already taken off the board, in id order.
    pub destroyed: Vec<PlacedBlock>,
    /// Every legal cell is occupied after the destruction: the caller should
    /// clear the board.
    pub fit_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(Placement),
    /// The board is unchanged.
    Rejected(PlacementRejected),
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed(_))
    }

    pub fn placement(&self) -> Option<&Placement> {
        match self {
            PlacementOutcome::Placed(placement) => Some(placement),
            PlacementOutcome::Rejected(_) => None,
        }
    }
}

/// Validate, commit, resolve, then check for a fit me.
///
/// Holds no board state: every call takes the board it works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementEngine {
    resolver: MatchResolver,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl PlacementEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            resolver: MatchResolver::new(config),
        }
    }

    pub fn resolver(&self) -> &MatchResolver {
        &self.resolver
    }

    /// Whether `block`'s rotated shape fits the board's vacancy at `anchor`.
    /// Doesn't touch the board, so it's fine to call on every drag event.
    pub fn validate(
        &self,
        board: &Board,
        block: &Block,
        rotation: Rotation,
        anchor: Position,
    ) -> bool {
        board.vacancy_mask().fits(block.shape(rotation), anchor)
    }

    pub fn place(
        &self,
        board: &mut Board,
        block: &Block,
        rotation: Rotation,
        anchor: Position,
    ) -> PlacementOutcome {
        debug_assert!(block.shape(rotation).count_set() > 0, "blocks always have atoms");
        // same answer as validate, without building a mask
        if let Err(reason) = board.try_place(block, rotation, anchor) {
            debug!("rejected {} at {anchor}: {reason}", block.id());
            return PlacementOutcome::Rejected(reason);
        }

        let matched = self.resolver.resolve(board, block.id());
        let destroyed = match matched.is_destructive() {
            true => matched
                .blocks
                .iter()
                .filter_map(|id| board.remove(*id))
                .collect::<Vec<_>>()
                .tap(|destroyed| info!("destroyed {} blocks", destroyed.len())),
            false => Vec::new(),
        };

        let fit_me = board.is_fully_occupied();
        if fit_me {
            info!("fit me, every legal cell is occupied");
        }
        PlacementOutcome::Placed(Placement {
            block: block.id(),
            matched,
            destroyed,
            fit_me,
        })
    }
}
