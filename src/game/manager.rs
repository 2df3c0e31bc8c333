//! The game manager: config, live state and move log.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::config::GameConfig;
use super::phase::Phase;
use super::state::{GameState, MoveOutcome, Pending};
use crate::board::{Player, Point, TileKind};
use crate::error::{EngineError, IllegalMove};
use crate::movegen;
use crate::notation::{Action, MoveRecord, Notation, NotationError};

/// Both players' current scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Scores {
    pub host: u32,
    pub guest: u32,
}

impl Scores {
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::Host => self.host,
            Player::Guest => self.guest,
        }
    }
}

/// Result of replaying a log.
#[derive(Debug, Clone)]
pub struct Replay {
    /// The game after every successfully applied record.
    pub game: Game,
    /// Number of records applied before replay stopped.
    pub applied: usize,
    /// Why replay stopped early, if it did.
    pub error: Option<EngineError>,
}

impl Replay {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// A game in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    notation: Notation,
}

impl Default for Game {
    fn default() -> Self {
        Game::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Game {
            config,
            state: GameState::new(),
            notation: Notation::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn notation(&self) -> &Notation {
        &self.notation
    }

    /// Applies a record and appends it to the log.
    ///
    /// The record must carry the next move number. On failure neither the
    /// state nor the log changes.
    #[instrument(
        skip(self, record),
        fields(
            move_num = record.move_num,
            player = %record.player,
            move_type = record.action.name()
        )
    )]
    pub fn apply_move(&mut self, record: &MoveRecord) -> Result<MoveOutcome, EngineError> {
        let expected = self.notation.next_move_num();
        if record.move_num != expected {
            return Err(IllegalMove::OutOfSequence {
                expected,
                found: record.move_num,
            }
            .into());
        }
        match self.state.apply(&self.config, record.player, &record.action) {
            Ok(outcome) => {
                if !outcome.captured.is_empty() {
                    debug!(
                        captured = outcome.captured.len(),
                        drawn = outcome.drawn.len(),
                        "captures resolved"
                    );
                }
                self.notation.push(record.clone());
                Ok(outcome)
            }
            Err(err) => {
                debug!(error = %err, "move rejected");
                Err(err)
            }
        }
    }

    /// Numbers `action` for the expected actor and applies it.
    pub fn play(&mut self, action: Action) -> Result<MoveOutcome, EngineError> {
        let record = self.next_record(action);
        self.apply_move(&record)
    }

    /// The record `action` would be logged as if the expected actor made it.
    pub fn next_record(&self, action: Action) -> MoveRecord {
        self.notation.next_record(self.state.expected_actor(), action)
    }

    /// Evaluates `action` for the expected actor on an independent copy.
    pub fn speculate(&self, action: &Action) -> Result<GameState, EngineError> {
        self.state
            .speculate(&self.config, self.state.expected_actor(), action)
    }

    /// Full independent copy, log included.
    pub fn copy(&self) -> Game {
        self.clone()
    }

    pub fn scores(&self) -> Scores {
        Scores {
            host: self.state.score(Player::Host),
            guest: self.state.score(Player::Guest),
        }
    }

    pub fn winner(&self) -> Option<Player> {
        self.state.winner()
    }

    pub fn winners(&self) -> &[Player] {
        self.state.winners()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player()
    }

    pub fn expected_actor(&self) -> Player {
        self.state.expected_actor()
    }

    pub fn pending(&self) -> Pending {
        self.state.pending()
    }

    /// Cells where the expected actor may deploy `kind`.
    pub fn legal_deploy_cells(&self, kind: TileKind) -> Vec<Point> {
        self.state
            .board()
            .legal_deploy_cells(self.state.expected_actor(), kind)
    }

    /// Cells the expected actor's tile on `from` may shift to.
    pub fn legal_shift_destinations(&self, from: Point) -> Vec<Point> {
        self.state
            .board()
            .legal_shift_destinations(from, self.state.expected_actor())
    }

    /// Every action the expected actor may legally submit now.
    pub fn legal_actions(&self) -> Vec<Action> {
        movegen::legal_actions(&self.config, &self.state)
    }

    /// Removes the most recent record by replaying the log without it.
    pub fn undo(&mut self) -> Result<Option<MoveRecord>, EngineError> {
        let mut records = self.notation.records().to_vec();
        let Some(last) = records.pop() else {
            return Ok(None);
        };
        let replay = Game::replay_records(self.config, records);
        if let Some(err) = replay.error {
            return Err(err);
        }
        *self = replay.game;
        Ok(Some(last))
    }

    pub fn encode_notation(&self) -> Result<String, NotationError> {
        self.notation.encode()
    }

    /// Rebuilds a game from an encoded log.
    ///
    /// Stops at the first malformed or illegal record and reports how many
    /// records were applied before it.
    pub fn replay(config: GameConfig, notation: &str) -> Replay {
        let (decoded, decode_error) = Notation::decode_prefix(notation);
        let mut replay = Game::replay_records(config, decoded.records().iter().cloned());
        if replay.error.is_none() {
            if let Some(err) = decode_error {
                warn!(applied = replay.applied, error = %err, "replay stopped at malformed record");
                replay.error = Some(err.into());
            }
        }
        replay
    }

    /// Applies records in order until one fails.
    pub fn replay_records(
        config: GameConfig,
        records: impl IntoIterator<Item = MoveRecord>,
    ) -> Replay {
        let mut game = Game::new(config);
        let mut applied = 0;
        for record in records {
            if let Err(err) = game.apply_move(&record) {
                warn!(applied, error = %err, "replay stopped at illegal record");
                return Replay {
                    game,
                    applied,
                    error: Some(err),
                };
            }
            applied += 1;
        }
        Replay {
            game,
            applied,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Facing;

    fn p(row: u8, col: u8) -> Point {
        Point::new(row, col).unwrap()
    }

    fn opened() -> Game {
        use TileKind::*;
        let mut game = Game::default();
        game.play(Action::SelectForHand {
            tiles: vec![Sai, Sai, Sword, Sword, Bow, Lotus, Wood],
        })
        .unwrap();
        game.play(Action::SelectForHand {
            tiles: vec![Earth, Sword, Sai, Bow, Lotus, Wood, Water, Fire],
        })
        .unwrap();
        game.play(Action::SelectForHand { tiles: vec![Air] }).unwrap();
        game
    }

    #[test]
    fn records_are_numbered_and_logged() {
        let game = opened();
        assert_eq!(game.notation().len(), 3);
        assert_eq!(game.notation().records()[2].player, Player::Host);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.expected_actor(), Player::Guest);
    }

    #[test]
    fn out_of_sequence_record_is_rejected() {
        let mut game = opened();
        let record = MoveRecord {
            move_num: 7,
            player: Player::Guest,
            action: Action::Draw { tile: TileKind::Air },
        };
        assert_eq!(
            game.apply_move(&record),
            Err(EngineError::IllegalMove(IllegalMove::OutOfSequence {
                expected: 3,
                found: 7,
            }))
        );
        assert_eq!(game.notation().len(), 3);
    }

    #[test]
    fn speculate_does_not_touch_live_game() {
        let game = opened();
        let action = Action::Deploy {
            tile: TileKind::Sword,
            end_point: p(2, 5),
            facing: Facing::Up,
        };
        let next = game.speculate(&action).unwrap();
        assert!(next.board().tile_at(p(2, 5)).is_some());
        assert!(game.state().board().tile_at(p(2, 5)).is_none());
    }

    #[test]
    fn undo_drops_the_last_record() {
        let mut game = opened();
        let before = game.copy();
        game.play(Action::Deploy {
            tile: TileKind::Sword,
            end_point: p(2, 5),
            facing: Facing::Up,
        })
        .unwrap();
        let undone = game.undo().unwrap().unwrap();
        assert!(matches!(undone.action, Action::Deploy { .. }));
        assert_eq!(game, before);

        let mut fresh = Game::default();
        assert_eq!(fresh.undo(), Ok(None));
    }

    #[test]
    fn replay_reports_applied_count() {
        let mut game = opened();
        game.play(Action::Deploy {
            tile: TileKind::Sword,
            end_point: p(2, 5),
            facing: Facing::Up,
        })
        .unwrap();
        let encoded = game.encode_notation().unwrap();
        let replay = Game::replay(GameConfig::default(), &encoded);
        assert!(replay.is_complete());
        assert_eq!(replay.applied, 4);
        assert_eq!(replay.game, game);
    }

    #[test]
    fn replay_stops_at_illegal_record() {
        let game = opened();
        let mut records = game.notation().records().to_vec();
        records.push(MoveRecord {
            move_num: 3,
            player: Player::Guest,
            action: Action::Deploy {
                tile: TileKind::Sword,
                end_point: p(7, 3),
                facing: Facing::Up,
            },
        });
        let encoded = records.into_iter().collect::<Notation>().encode().unwrap();
        let replay = Game::replay(GameConfig::default(), &encoded);
        assert_eq!(replay.applied, 3);
        assert!(matches!(
            replay.error,
            Some(EngineError::IllegalMove(IllegalMove::NotDeployable { .. }))
        ));
    }

    #[test]
    fn replay_stops_at_malformed_record() {
        let s = r#"[{"moveNum":0,"player":"HOST","moveType":"selectForHand","tiles":["sai"]},{"moveNum":1}]"#;
        let replay = Game::replay(GameConfig::default(), s);
        assert_eq!(replay.applied, 1);
        assert!(matches!(
            replay.error,
            Some(EngineError::MalformedNotation(NotationError::MalformedRecord { index: 1, .. }))
        ));
        assert_eq!(replay.game.state().tiles().hand_size(Player::Host), 1);
    }

    #[test]
    fn scores_by_player() {
        let scores = Scores { host: 4, guest: 9 };
        assert_eq!(scores.get(Player::Host), 4);
        assert_eq!(scores.get(Player::Guest), 9);
        assert_eq!(Game::default().scores(), Scores::default());
    }
}
