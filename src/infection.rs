//! Board-side primitives for the infection rule. Timers and which target gets
//! picked belong to the game.

use std::collections::BTreeSet;

use crate::{
    block::{BlockId, BlockState},
    board::Board,
};

/// Distinct [`Normal`](BlockState::Normal) blocks edge-adjacent to `source`,
/// in id order. Empty unless `source` is on the board and infectious.
pub fn spread_targets(board: &Board, source: BlockId) -> Vec<BlockId> {
    let Some(source) = board.block(source).filter(|block| block.state.is_infectious()) else {
        return Vec::new();
    };
    source
        .cells
        .iter()
        .flat_map(|position| board.neighbors_of(*position).iter())
        .filter_map(|cell| board.block_at(cell.position()))
        .filter(|block| block.id != source.id && block.state == BlockState::Normal)
        .map(|block| block.id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Returns `false` if `id` isn't on the board.
pub fn infect(board: &mut Board, id: BlockId) -> bool {
    board.set_state(id, BlockState::Infected).is_some()
}

/// Returns `false` if `id` isn't on the board.
pub fn disinfect(board: &mut Board, id: BlockId) -> bool {
    board.set_state(id, BlockState::Normal).is_some()
}
