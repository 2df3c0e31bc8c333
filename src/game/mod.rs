pub mod config;
pub mod manager;
pub mod phase;
pub mod state;

pub use config::{total_supply, CaptureDrawPolicy, ConfigError, GameConfig, TieBreak};
pub use manager::{Game, Replay, Scores};
pub use phase::Phase;
pub use state::{BonusShift, GameState, MoveOutcome, Pending, PendingDraws};
