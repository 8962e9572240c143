use std::collections::BTreeSet;

use derive_more::Display;
use log::debug;

use crate::{
    block::{BlockColor, BlockId},
    board::Board,
    config::EngineConfig,
};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreTier {
    #[display(fmt = "combo")]
    Combo,
    #[display(fmt = "bomb")]
    Bomb,
}

/// One same-colour connected group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub color: Option<BlockColor>,
    /// Includes the seed.
    pub blocks: BTreeSet<BlockId>,
    /// `None` below the destroy threshold.
    pub tier: Option<ScoreTier>,
}

impl MatchResult {
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_destructive(&self) -> bool {
        self.tier.is_some()
    }
}

/// Finds the same-colour group around a block.
///
/// Always walks the board as it is now, there's no state carried between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResolver {
    destroy_threshold: usize,
    bomb_threshold: usize,
}

impl MatchResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            destroy_threshold: config.destroy_threshold,
            bomb_threshold: config.bomb_threshold,
        }
    }

    pub fn tier_for(&self, size: usize) -> Option<ScoreTier> {
        match size {
            size if size > self.bomb_threshold && size >= self.destroy_threshold => {
                Some(ScoreTier::Bomb)
            }
            size if size >= self.destroy_threshold => Some(ScoreTier::Combo),
            _ => None,
        }
    }

    /// Blocks reachable from `start` through edge-sharing cells of blocks with
    /// the same colour. Infected blocks are walls. An infected or absent
    /// `start` yields an empty result.
    pub fn resolve(&self, board: &Board, start: BlockId) -> MatchResult {
        let Some(seed) = board.block(start).filter(|block| block.state.is_matchable()) else {
            return MatchResult::default();
        };
        let color = seed.color;
        let mut visited = BTreeSet::from([start]);
        let mut stack = vec![seed];
        while let Some(block) = stack.pop() {
            for position in &block.cells {
                for neighbor in board.neighbors_of(*position).iter() {
                    let Some(next) = board.block_at(neighbor.position()) else {
                        continue;
                    };
                    if next.color == color && next.state.is_matchable() && visited.insert(next.id) {
                        stack.push(next);
                    }
                }
            }
        }
        let tier = self.tier_for(visited.len());
        debug!(
            "{color} group from {start} has {} blocks, tier {tier:?}",
            visited.len()
        );
        MatchResult {
            color: Some(color),
            blocks: visited,
            tier,
        }
    }
}
