//! Game configuration.
//!
//! Loaded from JSON with every field optional:
//! `{"hostOpeningHand":7,"guestOpeningHand":8,"captureDraw":"firstAvailable"}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::ALL_TILE_KINDS;

/// How compensating draws are chosen when several kinds remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureDrawPolicy {
    /// The capturing player picks each kind with a `captureDraw` record.
    #[default]
    Delegate,
    /// The first remaining kind in catalog order is drawn automatically.
    FirstAvailable,
}

/// Winner ordering when both players cross the target score at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    #[default]
    MoverFirst,
    HostFirst,
}

/// Errors from loading a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(String),

    #[error("guest opening hand ({guest}) must be at least the host opening hand ({host})")]
    GuestHandTooSmall { host: usize, guest: usize },

    #[error("opening hand of {hand} plus compensation exceeds the supply of {supply}")]
    HandExceedsSupply { hand: usize, supply: usize },

    #[error("host compensation must be at least 1")]
    NoCompensation,

    #[error("winning score must be positive")]
    ZeroWinningScore,
}

/// Tunable rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub host_opening_hand: usize,
    pub guest_opening_hand: usize,
    pub host_compensation: usize,
    pub winning_score: u32,
    pub capture_draw: CaptureDrawPolicy,
    pub tie_break: TieBreak,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            host_opening_hand: 7,
            guest_opening_hand: 8,
            host_compensation: 1,
            winning_score: 10,
            capture_draw: CaptureDrawPolicy::Delegate,
            tie_break: TieBreak::MoverFirst,
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(s: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the opening-hand sizes and target score are playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guest_opening_hand < self.host_opening_hand {
            return Err(ConfigError::GuestHandTooSmall {
                host: self.host_opening_hand,
                guest: self.guest_opening_hand,
            });
        }
        if self.host_compensation == 0 {
            return Err(ConfigError::NoCompensation);
        }
        if self.winning_score == 0 {
            return Err(ConfigError::ZeroWinningScore);
        }
        let supply = total_supply();
        let largest = self
            .guest_opening_hand
            .max(self.host_opening_hand + self.host_compensation);
        if largest > supply {
            return Err(ConfigError::HandExceedsSupply { hand: largest, supply });
        }
        Ok(())
    }
}

/// Tiles each player owns across all kinds.
pub fn total_supply() -> usize {
    ALL_TILE_KINDS.iter().map(|k| k.info().supply as usize).sum()
}
