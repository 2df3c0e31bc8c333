//! Staging of multi-step user actions.
//!
//! The builder only remembers the pending selection. It never consults or
//! mutates game state, so cancelling at any stage needs no cleanup.

use thiserror::Error;

use super::record::Action;
use crate::board::{Facing, Player, Point, TileKind};

/// Errors from driving the builder out of order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("a move is already being built ({0})")]
    Busy(&'static str),

    #[error("not choosing a target (stage is {0})")]
    NotChoosingTarget(&'static str),

    #[error("not choosing a facing (stage is {0})")]
    NotChoosingFacing(&'static str),

    #[error("{kind} at {point} cannot stay in place")]
    CannotStay { kind: TileKind, point: Point },
}

/// The board move awaiting a facing choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingTarget {
    Deploy { tile: TileKind, end_point: Point },
    Shift { start_point: Point, end_point: Point },
    BonusShift { start_point: Point, end_point: Point },
}

impl FacingTarget {
    fn with_facing(self, facing: Facing) -> Action {
        match self {
            FacingTarget::Deploy { tile, end_point } => Action::Deploy {
                tile,
                end_point,
                facing,
            },
            FacingTarget::Shift {
                start_point,
                end_point,
            } if start_point == end_point => Action::Rotate {
                start_point,
                facing,
            },
            FacingTarget::Shift {
                start_point,
                end_point,
            } => Action::Shift {
                start_point,
                end_point,
                facing,
            },
            FacingTarget::BonusShift {
                start_point,
                end_point,
            } => Action::BonusShift {
                start_point,
                end_point,
                facing,
            },
        }
    }
}

/// Where the builder is in staging a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderStage {
    #[default]
    Idle,
    ChoosingDeployTarget {
        player: Player,
        tile: TileKind,
    },
    ChoosingShiftTarget {
        player: Player,
        from: Point,
        tile: TileKind,
        bonus: bool,
    },
    ChoosingFacing {
        player: Player,
        target: FacingTarget,
    },
}

impl BuilderStage {
    pub const fn name(&self) -> &'static str {
        match self {
            BuilderStage::Idle => "idle",
            BuilderStage::ChoosingDeployTarget { .. } => "choosing deploy target",
            BuilderStage::ChoosingShiftTarget { .. } => "choosing shift target",
            BuilderStage::ChoosingFacing { .. } => "choosing facing",
        }
    }
}

/// A finished action, ready to be numbered and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedMove {
    pub player: Player,
    pub action: Action,
}

/// Accumulates clicks into a complete action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveBuilder {
    stage: BuilderStage,
}

impl MoveBuilder {
    pub fn new() -> Self {
        MoveBuilder::default()
    }

    pub fn stage(&self) -> BuilderStage {
        self.stage
    }

    pub fn is_idle(&self) -> bool {
        self.stage == BuilderStage::Idle
    }

    /// Starts staging a deploy of `tile` from `player`'s hand.
    pub fn begin_deploy(&mut self, player: Player, tile: TileKind) -> Result<(), BuilderError> {
        self.ensure_idle()?;
        self.stage = BuilderStage::ChoosingDeployTarget { player, tile };
        Ok(())
    }

    /// Starts staging a shift of the `tile` standing on `from`.
    pub fn begin_shift(
        &mut self,
        player: Player,
        from: Point,
        tile: TileKind,
    ) -> Result<(), BuilderError> {
        self.ensure_idle()?;
        self.stage = BuilderStage::ChoosingShiftTarget {
            player,
            from,
            tile,
            bonus: false,
        };
        Ok(())
    }

    /// Starts staging the bonus shift of a freshly deployed tile.
    pub fn begin_bonus_shift(
        &mut self,
        player: Player,
        from: Point,
        tile: TileKind,
    ) -> Result<(), BuilderError> {
        self.ensure_idle()?;
        self.stage = BuilderStage::ChoosingShiftTarget {
            player,
            from,
            tile,
            bonus: true,
        };
        Ok(())
    }

    /// Picks the destination cell.
    ///
    /// Completes the move straight away when the tile does not rotate;
    /// otherwise moves on to choosing a facing and returns `None`.
    pub fn choose_target(&mut self, point: Point) -> Result<Option<StagedMove>, BuilderError> {
        let (player, tile, target) = match self.stage {
            BuilderStage::ChoosingDeployTarget { player, tile } => (
                player,
                tile,
                FacingTarget::Deploy {
                    tile,
                    end_point: point,
                },
            ),
            BuilderStage::ChoosingShiftTarget {
                player,
                from,
                tile,
                bonus,
            } => {
                if from == point && (bonus || !tile.info().rotates) {
                    return Err(BuilderError::CannotStay { kind: tile, point });
                }
                let target = if bonus {
                    FacingTarget::BonusShift {
                        start_point: from,
                        end_point: point,
                    }
                } else {
                    FacingTarget::Shift {
                        start_point: from,
                        end_point: point,
                    }
                };
                (player, tile, target)
            }
            other => return Err(BuilderError::NotChoosingTarget(other.name())),
        };

        if tile.info().rotates {
            self.stage = BuilderStage::ChoosingFacing { player, target };
            return Ok(None);
        }
        self.stage = BuilderStage::Idle;
        Ok(Some(StagedMove {
            player,
            action: target.with_facing(Facing::Up),
        }))
    }

    /// Picks the facing and completes the move.
    pub fn choose_facing(&mut self, facing: Facing) -> Result<StagedMove, BuilderError> {
        let BuilderStage::ChoosingFacing { player, target } = self.stage else {
            return Err(BuilderError::NotChoosingFacing(self.stage.name()));
        };
        self.stage = BuilderStage::Idle;
        Ok(StagedMove {
            player,
            action: target.with_facing(facing),
        })
    }

    /// Drops whatever is staged.
    pub fn cancel(&mut self) {
        self.stage = BuilderStage::Idle;
    }

    fn ensure_idle(&self) -> Result<(), BuilderError> {
        match self.stage {
            BuilderStage::Idle => Ok(()),
            other => Err(BuilderError::Busy(other.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: u8, col: u8) -> Point {
        Point::new(row, col).unwrap()
    }

    #[test]
    fn plain_deploy_completes_on_target() {
        let mut builder = MoveBuilder::new();
        builder.begin_deploy(Player::Host, TileKind::Sword).unwrap();
        let staged = builder.choose_target(p(12, 3)).unwrap().unwrap();
        assert_eq!(staged.player, Player::Host);
        assert_eq!(
            staged.action,
            Action::Deploy {
                tile: TileKind::Sword,
                end_point: p(12, 3),
                facing: Facing::Up,
            }
        );
        assert!(builder.is_idle());
    }

    #[test]
    fn rotating_deploy_waits_for_facing() {
        let mut builder = MoveBuilder::new();
        builder.begin_deploy(Player::Guest, TileKind::Bow).unwrap();
        assert_eq!(builder.choose_target(p(2, 4)).unwrap(), None);
        assert!(matches!(builder.stage(), BuilderStage::ChoosingFacing { .. }));
        let staged = builder.choose_facing(Facing::Down).unwrap();
        assert_eq!(
            staged.action,
            Action::Deploy {
                tile: TileKind::Bow,
                end_point: p(2, 4),
                facing: Facing::Down,
            }
        );
        assert!(builder.is_idle());
    }

    #[test]
    fn shift_to_own_cell_becomes_rotate() {
        let mut builder = MoveBuilder::new();
        builder.begin_shift(Player::Host, p(11, 4), TileKind::Fire).unwrap();
        assert_eq!(builder.choose_target(p(11, 4)).unwrap(), None);
        let staged = builder.choose_facing(Facing::Left).unwrap();
        assert_eq!(
            staged.action,
            Action::Rotate {
                start_point: p(11, 4),
                facing: Facing::Left,
            }
        );
    }

    #[test]
    fn non_rotating_tile_cannot_stay() {
        let mut builder = MoveBuilder::new();
        builder.begin_shift(Player::Host, p(11, 4), TileKind::Sai).unwrap();
        assert!(matches!(
            builder.choose_target(p(11, 4)),
            Err(BuilderError::CannotStay { .. })
        ));
        // Still waiting for a real target.
        let staged = builder.choose_target(p(10, 4)).unwrap().unwrap();
        assert!(matches!(staged.action, Action::Shift { .. }));
    }

    #[test]
    fn bonus_shift_emits_bonus_record() {
        let mut builder = MoveBuilder::new();
        builder.begin_bonus_shift(Player::Guest, p(3, 3), TileKind::Air).unwrap();
        let staged = builder.choose_target(p(5, 3)).unwrap().unwrap();
        assert_eq!(
            staged.action,
            Action::BonusShift {
                start_point: p(3, 3),
                end_point: p(5, 3),
                facing: Facing::Up,
            }
        );
    }

    #[test]
    fn wrong_stage_calls_fail() {
        let mut builder = MoveBuilder::new();
        assert_eq!(
            builder.choose_target(p(1, 1)),
            Err(BuilderError::NotChoosingTarget("idle"))
        );
        assert_eq!(
            builder.choose_facing(Facing::Up),
            Err(BuilderError::NotChoosingFacing("idle"))
        );
        builder.begin_deploy(Player::Host, TileKind::Lotus).unwrap();
        assert_eq!(
            builder.begin_shift(Player::Host, p(12, 3), TileKind::Lotus),
            Err(BuilderError::Busy("choosing deploy target"))
        );
    }

    #[test]
    fn cancel_returns_to_idle_from_any_stage() {
        let mut builder = MoveBuilder::new();
        builder.begin_deploy(Player::Host, TileKind::Bow).unwrap();
        builder.choose_target(p(12, 6)).unwrap();
        builder.cancel();
        assert!(builder.is_idle());
        builder.begin_shift(Player::Host, p(12, 6), TileKind::Bow).unwrap();
        builder.cancel();
        assert!(builder.is_idle());
    }
}
