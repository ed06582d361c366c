//! Falling-block engine: pieces, playfield and the simulation driving them.

pub mod game;
pub mod piece;
pub mod playfield;

pub use game::{Bag, DROP_INTERVAL, GameEvent, GameState};
pub use piece::{Piece, Rotation, Shape, TetrominoKind};
pub use playfield::{ARENA_HEIGHT, ARENA_WIDTH, EMPTY, Playfield, Sweep};
