//! Game state and move application.
//!
//! `GameState` composes the board, the off-board tile containers, the
//! phase/turn machine, pending special actions and the winners list. Every
//! move is applied to a private copy first; the live state is replaced only
//! when the whole move, including capture resolution and the self-capture
//! check, has succeeded.

use tracing::{debug, info};

use super::config::{CaptureDrawPolicy, GameConfig, TieBreak};
use super::phase::Phase;
use crate::board::{Board, Facing, Player, Point, Tile, TileKind, Zone, ALL_PLAYERS};
use crate::error::{EngineError, IllegalMove};
use crate::notation::Action;
use crate::tile_manager::TileManager;

/// Compensating draws a capturing player still has to choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDraws {
    pub player: Player,
    pub remaining: usize,
}

/// An armed bonus shift for the tile just deployed on `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusShift {
    pub player: Player,
    pub from: Point,
}

/// Special actions that must be resolved before the turn passes.
/// Owed draws are always settled before the bonus shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    pub draws: Option<PendingDraws>,
    pub bonus: Option<BonusShift>,
}

impl Pending {
    pub fn is_empty(&self) -> bool {
        self.draws.is_none() && self.bonus.is_none()
    }
}

/// What applying one move changed, beyond the state itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Tiles removed by capture resolution, in removal order.
    pub captured: Vec<Tile>,
    /// Kinds moved reserve → hand, including automatic compensating draws.
    pub drawn: Vec<TileKind>,
    /// Players appended to the winners list by this move.
    pub new_winners: Vec<Player>,
    /// The phase entered, if the move completed a selection phase.
    pub phase_changed: Option<Phase>,
}

/// Full rules state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    tiles: TileManager,
    phase: Phase,
    current: Player,
    pending: Pending,
    winners: Vec<Player>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// Creates the opening state: empty board, full reserves, host selecting.
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            tiles: TileManager::new(),
            phase: Phase::HostSelect,
            current: Player::Host,
            pending: Pending::default(),
            winners: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tiles(&self) -> &TileManager {
        &self.tiles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    /// Winners in the order they were declared.
    pub fn winners(&self) -> &[Player] {
        &self.winners
    }

    pub fn winner(&self) -> Option<Player> {
        self.winners.first().copied()
    }

    pub fn is_over(&self) -> bool {
        !self.winners.is_empty()
    }

    pub fn score(&self, player: Player) -> u32 {
        self.board.score_for(player)
    }

    /// The player who must submit the next record.
    ///
    /// Pending draws and bonus shifts always belong to the player whose
    /// turn it is, so outside selection this is the current player.
    pub fn expected_actor(&self) -> Player {
        self.phase.selecting_player().unwrap_or(self.current)
    }

    /// Applies `action` by `player`, leaving the state untouched on failure.
    pub fn apply(
        &mut self,
        config: &GameConfig,
        player: Player,
        action: &Action,
    ) -> Result<MoveOutcome, EngineError> {
        let mut next = self.clone();
        let outcome = next.apply_in_place(config, player, action)?;
        *self = next;
        Ok(outcome)
    }

    /// Returns the state `action` would produce, without touching `self`.
    pub fn speculate(
        &self,
        config: &GameConfig,
        player: Player,
        action: &Action,
    ) -> Result<GameState, EngineError> {
        let mut next = self.clone();
        next.apply_in_place(config, player, action)?;
        Ok(next)
    }

    fn apply_in_place(
        &mut self,
        config: &GameConfig,
        player: Player,
        action: &Action,
    ) -> Result<MoveOutcome, EngineError> {
        if self.is_over() {
            return Err(IllegalMove::GameOver.into());
        }
        let expected = self.expected_actor();
        if player != expected {
            return Err(IllegalMove::WrongActor {
                expected,
                found: player,
            }
            .into());
        }

        let mut outcome = MoveOutcome::default();
        match action {
            Action::SelectForHand { tiles } => {
                self.select_for_hand(config, player, tiles, &mut outcome)?
            }
            Action::CaptureDraw { tile } => self.capture_draw(config, player, *tile, &mut outcome)?,
            Action::Pass => self.pass(config, player)?,
            _ => self.action_move(config, player, action, &mut outcome)?,
        }
        Ok(outcome)
    }

    fn require_playing(&self, action: &Action) -> Result<(), IllegalMove> {
        if self.phase == Phase::Playing {
            Ok(())
        } else {
            Err(IllegalMove::WrongPhase {
                phase: self.phase,
                action: action.name(),
            })
        }
    }

    fn select_for_hand(
        &mut self,
        config: &GameConfig,
        player: Player,
        kinds: &[TileKind],
        outcome: &mut MoveOutcome,
    ) -> Result<(), EngineError> {
        let Some(target) = self.phase.hand_target(config) else {
            return Err(IllegalMove::WrongPhase {
                phase: self.phase,
                action: "selectForHand",
            }
            .into());
        };
        if kinds.is_empty() {
            return Err(IllegalMove::EmptySelection.into());
        }
        let selected = self.tiles.hand_size(player) + kinds.len();
        if selected > target {
            return Err(IllegalMove::SelectionOvershoot { selected, target }.into());
        }

        for &kind in kinds {
            self.tiles.draw_from_reserve(player, kind)?;
            outcome.drawn.push(kind);
        }

        if selected == target {
            self.phase = self.phase.next();
            self.current = player.opponent();
            outcome.phase_changed = Some(self.phase);
            debug!(phase = %self.phase, next = %self.current, "selection phase complete");
        }
        Ok(())
    }

    fn capture_draw(
        &mut self,
        config: &GameConfig,
        player: Player,
        kind: TileKind,
        outcome: &mut MoveOutcome,
    ) -> Result<(), EngineError> {
        self.require_playing(&Action::CaptureDraw { tile: kind })?;
        let Some(mut draws) = self.pending.draws else {
            return Err(IllegalMove::NoCaptureDrawOwed.into());
        };
        self.tiles.draw_from_reserve(player, kind)?;
        outcome.drawn.push(kind);
        draws.remaining -= 1;
        self.pending.draws = (draws.remaining > 0).then_some(draws);
        self.settle_draws(config, &mut outcome.drawn);
        self.end_turn_if_settled();
        Ok(())
    }

    fn pass(&mut self, config: &GameConfig, player: Player) -> Result<(), EngineError> {
        self.require_playing(&Action::Pass)?;
        if self.pending.draws.is_some() {
            return Err(IllegalMove::PendingCaptureDraw(player).into());
        }
        if self.pending.bonus.take().is_none() && crate::movegen::has_legal_action(config, self) {
            return Err(IllegalMove::PassNotAllowed.into());
        }
        debug!(%player, "pass");
        self.end_turn_if_settled();
        Ok(())
    }

    /// Deploy, shift, rotate, draw and bonus shift.
    fn action_move(
        &mut self,
        config: &GameConfig,
        player: Player,
        action: &Action,
        outcome: &mut MoveOutcome,
    ) -> Result<(), EngineError> {
        self.require_playing(action)?;
        if self.pending.draws.is_some() {
            return Err(IllegalMove::PendingCaptureDraw(player).into());
        }
        match (self.pending.bonus, action) {
            (Some(bonus), Action::BonusShift { start_point, .. }) if bonus.from == *start_point => {
                self.pending.bonus = None;
            }
            (_, Action::BonusShift { start_point, .. }) => {
                return Err(IllegalMove::NoBonusShift(*start_point).into());
            }
            (Some(bonus), _) => return Err(IllegalMove::PendingBonusShift(bonus.from).into()),
            (None, _) => {}
        }

        self.board.clear_just_placed();

        let mut armed_bonus = None;
        match *action {
            Action::Deploy {
                tile,
                end_point,
                facing,
            } => {
                self.deploy(player, tile, end_point, facing)?;
                if tile.info().bonus_shift {
                    armed_bonus = Some(end_point);
                }
            }
            Action::Shift {
                start_point,
                end_point,
                facing,
            } if start_point == end_point => self.rotate(player, start_point, facing)?,
            Action::Shift {
                start_point,
                end_point,
                facing,
            }
            | Action::BonusShift {
                start_point,
                end_point,
                facing,
            } => self.shift(player, start_point, end_point, facing)?,
            Action::Rotate {
                start_point,
                facing,
            } => self.rotate(player, start_point, facing)?,
            Action::Draw { tile } => {
                self.tiles.draw_from_reserve(player, tile)?;
                outcome.drawn.push(tile);
            }
            Action::SelectForHand { .. } | Action::CaptureDraw { .. } | Action::Pass => {}
        }

        outcome.captured = self.resolve_captures(player);

        let exposed = self.board.tiles_capturable(player);
        if !exposed.is_empty() {
            debug!(%player, ?exposed, "rejected self-capturing move");
            return Err(EngineError::SelfCaptureRejected {
                player,
                points: exposed,
            });
        }

        if !outcome.captured.is_empty() {
            self.pending.draws = Some(PendingDraws {
                player,
                remaining: outcome.captured.len(),
            });
            self.settle_draws(config, &mut outcome.drawn);
        }

        if let Some(from) = armed_bonus {
            if !self.board.legal_shift_destinations(from, player).is_empty() {
                self.pending.bonus = Some(BonusShift { player, from });
            }
        }

        outcome.new_winners = self.record_winners(config, player);
        self.end_turn_if_settled();
        Ok(())
    }

    fn deploy(
        &mut self,
        player: Player,
        kind: TileKind,
        point: Point,
        facing: Facing,
    ) -> Result<(), EngineError> {
        let mut tile = self.tiles.take_from_hand(player, kind)?;
        if !self.board.can_deploy(player, kind, point) {
            return Err(deploy_rejection(&self.board, kind, point).into());
        }
        tile.facing = tile.info().effective_facing(facing);
        tile.just_placed = true;
        self.board.place_tile(tile, point)?;
        Ok(())
    }

    fn shift(
        &mut self,
        player: Player,
        from: Point,
        to: Point,
        facing: Facing,
    ) -> Result<(), EngineError> {
        let tile = self.owned_tile(player, from)?;
        if !self.board.legal_shift_destinations(from, player).contains(&to) || from == to {
            return Err(IllegalMove::Unreachable { from, to }.into());
        }
        self.board.move_tile(from, to)?;
        if tile.info().rotates {
            self.board.set_facing(to, facing)?;
        }
        Ok(())
    }

    fn rotate(&mut self, player: Player, point: Point, facing: Facing) -> Result<(), EngineError> {
        let tile = self.owned_tile(player, point)?;
        if !tile.info().rotates {
            return Err(IllegalMove::CannotRotate(point).into());
        }
        if tile.facing == facing {
            return Err(IllegalMove::SameFacing(point, facing).into());
        }
        self.board.set_facing(point, facing)?;
        Ok(())
    }

    fn owned_tile(&self, player: Player, point: Point) -> Result<Tile, IllegalMove> {
        let tile = *self.board.tile_at(point).ok_or(IllegalMove::Empty(point))?;
        if tile.owner != player {
            return Err(IllegalMove::NotOwner(point));
        }
        Ok(tile)
    }

    /// Removes every capturable opponent tile, repeating until none is left.
    fn resolve_captures(&mut self, mover: Player) -> Vec<Tile> {
        let victim = mover.opponent();
        let mut captured = Vec::new();
        loop {
            let points = self.board.tiles_capturable(victim);
            if points.is_empty() {
                break;
            }
            for point in points {
                if let Some(tile) = self.board.remove_tile(point) {
                    debug!(%mover, %point, kind = %tile.kind, id = %tile.id, "captured");
                    self.tiles.send_to_discard(tile);
                    captured.push(tile);
                }
            }
        }
        captured
    }

    /// Takes owed draws that need no choice.
    ///
    /// Forfeits what the reserve cannot cover. Stops while a choice between
    /// several kinds is still owed under the delegate policy.
    fn settle_draws(&mut self, config: &GameConfig, drawn: &mut Vec<TileKind>) {
        while let Some(mut draws) = self.pending.draws {
            let kinds = self.tiles.reserve_kinds(draws.player);
            let Some(&first) = kinds.first() else {
                debug!(player = %draws.player, forfeited = draws.remaining, "reserve empty");
                self.pending.draws = None;
                break;
            };
            if kinds.len() > 1 && config.capture_draw == CaptureDrawPolicy::Delegate {
                break;
            }
            if self.tiles.draw_from_reserve(draws.player, first).is_err() {
                self.pending.draws = None;
                break;
            }
            drawn.push(first);
            draws.remaining -= 1;
            self.pending.draws = (draws.remaining > 0).then_some(draws);
        }
    }

    fn record_winners(&mut self, config: &GameConfig, mover: Player) -> Vec<Player> {
        let order = match config.tie_break {
            TieBreak::MoverFirst => [mover, mover.opponent()],
            TieBreak::HostFirst => ALL_PLAYERS,
        };
        let mut added = Vec::new();
        for player in order {
            if self.winners.contains(&player) {
                continue;
            }
            let score = self.score(player);
            if score >= config.winning_score {
                info!(%player, score, "winner declared");
                self.winners.push(player);
                added.push(player);
            }
        }
        added
    }

    fn end_turn_if_settled(&mut self) {
        if self.pending.is_empty() {
            self.current = self.current.opponent();
        }
    }
}

/// The most specific reason a deploy target was refused.
fn deploy_rejection(board: &Board, kind: TileKind, point: Point) -> IllegalMove {
    if point.zone() == Zone::NonPlayable {
        IllegalMove::NotPlayable(point)
    } else if board.tile_at(point).is_some() {
        IllegalMove::Occupied(point)
    } else {
        IllegalMove::NotDeployable { kind, point }
    }
}
