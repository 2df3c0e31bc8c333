//! Random playouts.
//!
//! Plays many independent games with uniformly random legal moves. Each game
//! owns its state and tile allocator, so games run concurrently on a rayon
//! pool without sharing anything. Used to exercise the rules engine at scale
//! and to produce logs for replay checks.

use std::io::Write;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::board::Player;
use crate::error::EngineError;
use crate::game::{Game, GameConfig, Scores};
use crate::movegen::random_action;
use crate::notation::NotationError;

/// Errors from running or writing playouts.
#[derive(Debug, Error)]
pub enum PlayoutError {
    #[error("engine rejected a generated move: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write playouts: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize playout: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for a batch of random playouts.
#[derive(Debug, Clone)]
pub struct PlayoutConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Moves after which an unfinished game is abandoned.
    pub max_moves: usize,
    /// Number of parallel threads; 1 plays sequentially.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Rules every game is played under.
    pub game: GameConfig,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        PlayoutConfig {
            num_games: 10,
            max_moves: 400,
            threads: 4,
            seed: 0,
            game: GameConfig::default(),
        }
    }
}

/// One finished (or abandoned) playout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayoutRecord {
    pub game_id: usize,
    /// Number of records applied.
    pub moves: usize,
    /// Encoded move log; replays to the same final state.
    pub notation: String,
    pub scores: Scores,
    pub winner: Option<Player>,
    pub winners: Vec<Player>,
}

fn seeded_rng(seed: u64, offset: u64) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(offset))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game with random legal moves until it ends or hits the cap.
pub fn play_game(
    config: &PlayoutConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<PlayoutRecord, PlayoutError> {
    let mut game = Game::new(config.game);
    while game.notation().len() < config.max_moves {
        let Some(action) = random_action(game.config(), game.state(), rng) else {
            break;
        };
        game.play(action)?;
    }
    Ok(PlayoutRecord {
        game_id,
        moves: game.notation().len(),
        notation: game.encode_notation()?,
        scores: game.scores(),
        winner: game.winner(),
        winners: game.winners().to_vec(),
    })
}

/// Runs the configured number of playouts, returned in game-id order.
///
/// When `config.threads > 1`, games are played concurrently using rayon,
/// game `i` seeded with `seed + i`.
pub fn run_playouts(config: &PlayoutConfig) -> Result<Vec<PlayoutRecord>, PlayoutError> {
    let start = Instant::now();
    let records = if config.threads > 1 {
        run_parallel(config)?
    } else {
        run_sequential(config)?
    };
    let decided = records.iter().filter(|r| r.winner.is_some()).count();
    info!(
        games = records.len(),
        decided,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "playouts finished"
    );
    Ok(records)
}

fn run_sequential(config: &PlayoutConfig) -> Result<Vec<PlayoutRecord>, PlayoutError> {
    let mut rng = seeded_rng(config.seed, 0);
    let mut records = Vec::with_capacity(config.num_games);
    for i in 0..config.num_games {
        let record = play_game(config, i, &mut rng)?;
        debug!(game = i, moves = record.moves, winner = ?record.winner, "playout done");
        records.push(record);
    }
    Ok(records)
}

fn run_parallel(config: &PlayoutConfig) -> Result<Vec<PlayoutRecord>, PlayoutError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| {
                let mut rng = seeded_rng(config.seed, i as u64);
                let record = play_game(config, i, &mut rng)?;
                debug!(game = i, moves = record.moves, winner = ?record.winner, "playout done");
                Ok(record)
            })
            .collect()
    })
}

/// Writes playout records as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(records: &[PlayoutRecord], out: &mut W) -> Result<(), PlayoutError> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(threads: usize) -> PlayoutConfig {
        PlayoutConfig {
            num_games: 3,
            max_moves: 40,
            threads,
            seed: 11,
            game: GameConfig::default(),
        }
    }

    #[test]
    fn sequential_playouts_respect_cap() {
        let records = run_playouts(&small(1)).unwrap();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.game_id, i);
            assert!(record.moves <= 40);
            assert!(record.moves >= 3);
        }
    }

    #[test]
    fn parallel_playouts_are_seeded_per_game() {
        let a = run_playouts(&small(2)).unwrap();
        let b = run_playouts(&small(2)).unwrap();
        let logs_a: Vec<&str> = a.iter().map(|r| r.notation.as_str()).collect();
        let logs_b: Vec<&str> = b.iter().map(|r| r.notation.as_str()).collect();
        assert_eq!(logs_a, logs_b);
    }

    #[test]
    fn playout_logs_replay() {
        let records = run_playouts(&small(1)).unwrap();
        for record in records {
            let replay = Game::replay(GameConfig::default(), &record.notation);
            assert!(replay.is_complete());
            assert_eq!(replay.applied, record.moves);
            assert_eq!(replay.game.scores(), record.scores);
        }
    }

    #[test]
    fn jsonl_has_one_line_per_game() {
        let records = run_playouts(&small(1)).unwrap();
        let mut out = Vec::new();
        write_jsonl(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l.starts_with("{\"gameId\":")));
    }
}
