//! Grid placement and matching for MadDuck.
//!
//! Blocks are polyominoes dragged onto a board of legal cells. Same-colour
//! blocks that touch edge to edge form groups, and a group at or above the
//! destroy threshold is removed. Filling every legal cell is a "fit me".
//!
//! Everything is synchronous and single-writer: one [`PlacementEngine::place`]
//! finishes, removals included, before the next begins.

pub mod availability;
pub mod block;
pub mod board;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod infection;
pub mod matching;
pub mod shape;

pub use block::{Block, BlockColor, BlockFace, BlockId, BlockState};
pub use board::{Board, Cell, GridPreset, Occupant, PlacedBlock, PlacementRejected};
pub use catalog::ShapeCatalog;
pub use config::{ConfigError, EngineConfig};
pub use engine::{Placement, PlacementEngine, PlacementOutcome};
pub use geometry::{Position, Rotation};
pub use matching::{MatchResolver, MatchResult, ScoreTier};
pub use shape::{ShapeError, ShapeMatrix};
