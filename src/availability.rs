//! Can anything still go on the board? Pure queries, nothing here mutates.

use log::debug;

use crate::{
    block::{Block, BlockId},
    board::Board,
    geometry::{Position, Rotation},
    shape::ShapeMatrix,
};

/// The first rotation, then the first row-major anchor, at which `block` fits.
pub fn find_placement(vacancy: &ShapeMatrix, block: &Block) -> Option<(Rotation, Position)> {
    block
        .catalog()
        .iter()
        .find_map(|(rotation, shape)| vacancy.find_fit(shape).map(|anchor| (rotation, anchor)))
}

/// Whether at least one candidate fits somewhere in some rotation. `false`
/// means game over.
pub fn any_placeable<'a>(board: &Board, candidates: impl IntoIterator<Item = &'a Block>) -> bool {
    let vacancy = board.vacancy_mask();
    let placeable = candidates
        .into_iter()
        .any(|block| find_placement(&vacancy, block).is_some());
    if !placeable {
        debug!("no candidate can be placed");
    }
    placeable
}

/// The candidates that fit somewhere, in input order.
pub fn placeable_blocks<'a>(
    board: &Board,
    candidates: impl IntoIterator<Item = &'a Block>,
) -> Vec<BlockId> {
    let vacancy = board.vacancy_mask();
    candidates
        .into_iter()
        .filter(|block| find_placement(&vacancy, block).is_some())
        .map(Block::id)
        .collect()
}

/// Walk `offers` in order and keep, up to `limit`, the ones that still fit
/// once the earlier picks have taken their space.
///
/// Used to pick a spawn set that is guaranteed playable in sequence.
pub fn select_fitting<'a, T>(
    vacancy: &ShapeMatrix,
    offers: impl IntoIterator<Item = (T, &'a ShapeMatrix)>,
    limit: usize,
) -> Vec<T> {
    let mut remaining = vacancy.clone();
    let mut picked = Vec::new();
    for (offer, shape) in offers {
        if picked.len() >= limit {
            break;
        }
        if let Some((_, consumed)) = remaining.consume_first_fit(shape) {
            remaining = consumed;
            picked.push(offer);
        }
    }
    picked
}
