//! Per-cell threat and cover tallies.
//!
//! Influence is always rebuilt from the full set of placed tiles; nothing is
//! patched incrementally.

use super::point::{Player, Point, ALL_PLAYERS, CELL_COUNT};
use super::tile::Tile;

/// Accumulated influence for every cell, indexed by `Point::index()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Influence {
    /// Threat counts by attacking player.
    threat: [[u8; CELL_COUNT]; 2],
    /// Cover flags by owning player.
    cover: [[bool; CELL_COUNT]; 2],
    /// Cells where the indexed player's deploy-blocking tiles threaten.
    deny: [[bool; CELL_COUNT]; 2],
}

impl Influence {
    /// Creates tallies for an empty board.
    pub fn empty() -> Self {
        Influence {
            threat: [[0; CELL_COUNT]; 2],
            cover: [[false; CELL_COUNT]; 2],
            deny: [[false; CELL_COUNT]; 2],
        }
    }

    /// Builds tallies from scratch for the given cell contents.
    pub fn compute(cells: &[Option<Tile>; CELL_COUNT]) -> Self {
        let mut influence = Influence::empty();
        for (idx, cell) in cells.iter().enumerate() {
            if let Some(tile) = cell {
                influence.project(Point::from_index(idx), tile);
            }
        }
        influence
    }

    fn project(&mut self, origin: Point, tile: &Tile) {
        let info = tile.info();
        let owner = tile.owner.index();
        for (dr, dc) in tile.kind.threat_offsets(tile.facing) {
            let Some(target) = origin.offset(dr, dc) else {
                continue;
            };
            let idx = target.index();
            if info.threatens_all {
                for player in ALL_PLAYERS {
                    self.threat[player.index()][idx] += 1;
                }
            } else {
                self.threat[owner][idx] += 1;
            }
            if info.blocks_deploy {
                self.deny[owner][idx] = true;
            }
        }
        for (dr, dc) in tile.kind.cover_offsets(tile.facing) {
            if let Some(target) = origin.offset(dr, dc) {
                self.cover[owner][target.index()] = true;
            }
        }
    }

    /// Threat `attacker` projects onto `point`.
    pub fn threat(&self, attacker: Player, point: Point) -> u8 {
        self.threat[attacker.index()][point.index()]
    }

    /// Whether `owner` covers `point`.
    pub fn covered(&self, owner: Player, point: Point) -> bool {
        self.cover[owner.index()][point.index()]
    }

    /// Whether `blocker` forbids its opponent from deploying on `point`.
    pub fn denies(&self, blocker: Player, point: Point) -> bool {
        self.deny[blocker.index()][point.index()]
    }
}
