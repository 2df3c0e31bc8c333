//! Engine error taxonomy.
//!
//! Every error is recoverable: a failed operation leaves the game state
//! exactly as it was.

use thiserror::Error;

use crate::board::{Facing, Player, Point, TileKind};
use crate::game::Phase;
use crate::notation::NotationError;
use crate::tile_manager::Container;

/// Reasons a move is rejected by the rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("cell {0} is occupied")]
    Occupied(Point),

    #[error("cell {0} is empty")]
    Empty(Point),

    #[error("cell {0} is not playable")]
    NotPlayable(Point),

    #[error("{kind} cannot be deployed at {point}")]
    NotDeployable { kind: TileKind, point: Point },

    #[error("{to} is not reachable from {from}")]
    Unreachable { from: Point, to: Point },

    #[error("tile at {0} belongs to the other player")]
    NotOwner(Point),

    #[error("tile at {0} cannot rotate")]
    CannotRotate(Point),

    #[error("tile at {0} already faces {1}")]
    SameFacing(Point, Facing),

    #[error("{expected} is to act, not {found}")]
    WrongActor { expected: Player, found: Player },

    #[error("{action} is not allowed during {phase}")]
    WrongPhase { phase: Phase, action: &'static str },

    #[error("expected move number {expected}, got {found}")]
    OutOfSequence { expected: u32, found: u32 },

    #[error("selecting {selected} tiles would pass the hand target of {target}")]
    SelectionOvershoot { selected: usize, target: usize },

    #[error("selection is empty")]
    EmptySelection,

    #[error("{0} must first take the compensating draws owed for captures")]
    PendingCaptureDraw(Player),

    #[error("the bonus shift from {0} must be taken or passed")]
    PendingBonusShift(Point),

    #[error("no compensating draw is owed")]
    NoCaptureDrawOwed,

    #[error("no bonus shift is armed at {0}")]
    NoBonusShift(Point),

    #[error("pass is only allowed to decline a bonus shift or when no other move exists")]
    PassNotAllowed,

    #[error("the game is over")]
    GameOver,
}

/// Top-level error returned at the engine boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    #[error("move would leave {player} tiles capturable at {points:?}")]
    SelfCaptureRejected { player: Player, points: Vec<Point> },

    #[error("malformed notation: {0}")]
    MalformedNotation(#[from] NotationError),

    #[error("{player} has no {kind} in {container}")]
    EmptyContainer {
        player: Player,
        kind: TileKind,
        container: Container,
    },
}
