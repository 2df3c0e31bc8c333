use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use crate::board::Player;

/// Turn-structure phase. Advances forward only; `Playing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    HostSelect,
    GuestSelect,
    HostSelectOne,
    Playing,
}

impl Phase {
    pub const fn is_selection(self) -> bool {
        !matches!(self, Phase::Playing)
    }

    /// The player who selects during this phase.
    pub const fn selecting_player(self) -> Option<Player> {
        match self {
            Phase::HostSelect | Phase::HostSelectOne => Some(Player::Host),
            Phase::GuestSelect => Some(Player::Guest),
            Phase::Playing => None,
        }
    }

    /// Hand size at which this selection phase is complete.
    pub fn hand_target(self, config: &GameConfig) -> Option<usize> {
        match self {
            Phase::HostSelect => Some(config.host_opening_hand),
            Phase::GuestSelect => Some(config.guest_opening_hand),
            Phase::HostSelectOne => Some(config.host_opening_hand + config.host_compensation),
            Phase::Playing => None,
        }
    }

    /// The following phase.
    pub const fn next(self) -> Phase {
        match self {
            Phase::HostSelect => Phase::GuestSelect,
            Phase::GuestSelect => Phase::HostSelectOne,
            Phase::HostSelectOne | Phase::Playing => Phase::Playing,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Phase::HostSelect => "host selection",
            Phase::GuestSelect => "guest selection",
            Phase::HostSelectOne => "host compensation selection",
            Phase::Playing => "play",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_forward_once() {
        let mut phase = Phase::HostSelect;
        let mut seen = vec![phase];
        while phase != Phase::Playing {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![Phase::HostSelect, Phase::GuestSelect, Phase::HostSelectOne, Phase::Playing]
        );
        assert_eq!(Phase::Playing.next(), Phase::Playing);
    }

    #[test]
    fn targets_follow_config() {
        let config = GameConfig::default();
        assert_eq!(Phase::HostSelect.hand_target(&config), Some(7));
        assert_eq!(Phase::GuestSelect.hand_target(&config), Some(8));
        assert_eq!(Phase::HostSelectOne.hand_target(&config), Some(8));
        assert_eq!(Phase::Playing.hand_target(&config), None);
    }

    #[test]
    fn selectors() {
        assert_eq!(Phase::HostSelectOne.selecting_player(), Some(Player::Host));
        assert_eq!(Phase::GuestSelect.selecting_player(), Some(Player::Guest));
        assert!(!Phase::Playing.is_selection());
    }
}
