//! Paiko rules engine library.
//!
//! Exposes the board and tile catalog, tile containers, move notation, the
//! game manager, move generation and random playouts. The engine is a
//! deterministic state machine: it accepts move records, validates and
//! applies them, resolves captures, and answers queries for rendering.

pub mod board;
pub mod error;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod playout;
pub mod tile_manager;

pub use board::{Board, Facing, Player, Point, Tile, TileKind, Zone};
pub use error::{EngineError, IllegalMove};
pub use game::{Game, GameConfig, GameState, MoveOutcome, Phase, Replay, Scores};
pub use notation::{Action, MoveBuilder, MoveRecord, Notation, NotationError};
pub use tile_manager::{Container, TileManager};
