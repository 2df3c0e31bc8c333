//! Board representation.
//!
//! Holds the tile standing on each cell together with the influence tallies
//! derived from them. Uses fixed-size arrays indexed by `Point::index()`, so
//! a speculative copy is a flat memory copy with no shared references.

use std::collections::VecDeque;

use super::influence::Influence;
use super::point::{Player, Point, Zone, ALL_POINTS, CELL_COUNT};
use super::tile::{Facing, Tile, TileKind};
use crate::error::IllegalMove;

/// Read-only view of a single cell for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub point: Point,
    pub zone: Zone,
    pub occupant: Option<Tile>,
    /// Threat by attacking player, indexed by `Player::index()`.
    pub threat: [u8; 2],
    /// Cover by owning player, indexed by `Player::index()`.
    pub cover: [bool; 2],
}

/// Complete spatial state of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Tile>; CELL_COUNT],
    influence: Influence,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Board {
            cells: [None; CELL_COUNT],
            influence: Influence::empty(),
        }
    }

    /// Returns the tile standing on `point`, if any.
    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.cells[point.index()].as_ref()
    }

    /// Returns a rendering snapshot of one cell.
    pub fn cell(&self, point: Point) -> CellView {
        CellView {
            point,
            zone: point.zone(),
            occupant: self.cells[point.index()],
            threat: [
                self.influence.threat(Player::Host, point),
                self.influence.threat(Player::Guest, point),
            ],
            cover: [
                self.influence.covered(Player::Host, point),
                self.influence.covered(Player::Guest, point),
            ],
        }
    }

    /// Iterates snapshots of every grid cell in index order.
    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        ALL_POINTS.iter().map(|&p| self.cell(p))
    }

    /// Iterates occupied cells.
    pub fn occupied(&self) -> impl Iterator<Item = (Point, &Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|t| (Point::from_index(i), t)))
    }

    /// Iterates the cells holding `player`'s tiles.
    pub fn tiles_of(&self, player: Player) -> impl Iterator<Item = (Point, &Tile)> + '_ {
        self.occupied().filter(move |(_, t)| t.owner == player)
    }

    /// Current influence tallies.
    pub fn influence(&self) -> &Influence {
        &self.influence
    }

    /// Threat `attacker` projects onto `point`.
    pub fn threat(&self, attacker: Player, point: Point) -> u8 {
        self.influence.threat(attacker, point)
    }

    /// Whether `owner` covers `point`.
    pub fn covered(&self, owner: Player, point: Point) -> bool {
        self.influence.covered(owner, point)
    }

    /// Places a tile on an empty cell.
    ///
    /// Fails on occupied or non-playable cells, and on blacked-out cells
    /// unless the tile's kind may be deployed anywhere.
    pub fn place_tile(&mut self, tile: Tile, point: Point) -> Result<(), IllegalMove> {
        match point.zone() {
            Zone::NonPlayable => return Err(IllegalMove::NotPlayable(point)),
            Zone::BlackedOut if !tile.info().deploy_anywhere => {
                return Err(IllegalMove::NotDeployable {
                    kind: tile.kind,
                    point,
                })
            }
            _ => {}
        }
        let slot = &mut self.cells[point.index()];
        if slot.is_some() {
            return Err(IllegalMove::Occupied(point));
        }
        *slot = Some(tile);
        self.recompute_influence();
        Ok(())
    }

    /// Moves the tile on `from` to the empty playable cell `to`.
    pub fn move_tile(&mut self, from: Point, to: Point) -> Result<(), IllegalMove> {
        if !to.is_playable() {
            return Err(IllegalMove::NotPlayable(to));
        }
        if self.cells[to.index()].is_some() {
            return Err(IllegalMove::Occupied(to));
        }
        let tile = self.cells[from.index()]
            .take()
            .ok_or(IllegalMove::Empty(from))?;
        self.cells[to.index()] = Some(tile);
        self.recompute_influence();
        Ok(())
    }

    /// Removes and returns the tile on `point`.
    pub fn remove_tile(&mut self, point: Point) -> Option<Tile> {
        let tile = self.cells[point.index()].take();
        if tile.is_some() {
            self.recompute_influence();
        }
        tile
    }

    /// Turns the tile on `point` to `facing`.
    pub fn set_facing(&mut self, point: Point, facing: Facing) -> Result<(), IllegalMove> {
        let tile = self.cells[point.index()]
            .as_mut()
            .ok_or(IllegalMove::Empty(point))?;
        tile.facing = facing;
        self.recompute_influence();
        Ok(())
    }

    /// Clears the "just placed" marker on every tile.
    pub fn clear_just_placed(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            tile.just_placed = false;
        }
    }

    /// Rebuilds all threat and cover tallies from the placed tiles.
    pub fn recompute_influence(&mut self) {
        self.influence = Influence::compute(&self.cells);
    }

    /// Returns true if `player` may deploy a `kind` tile on `point`.
    ///
    /// Deploy-anywhere kinds only need an empty playable cell. Other kinds
    /// are kept off blacked-out cells and off cells an opponent's
    /// deploy-blocking tile threatens, and outside their own territory need
    /// the player's threat there with none from the opponent.
    pub fn can_deploy(&self, player: Player, kind: TileKind, point: Point) -> bool {
        let zone = point.zone();
        if !zone.is_playable() || self.cells[point.index()].is_some() {
            return false;
        }
        if kind.info().deploy_anywhere {
            return true;
        }
        if zone == Zone::BlackedOut {
            return false;
        }
        let opponent = player.opponent();
        if self.influence.denies(opponent, point) {
            return false;
        }
        if zone.territory_of() == Some(player) {
            return true;
        }
        self.influence.threat(player, point) > 0 && self.influence.threat(opponent, point) == 0
    }

    /// Every cell where `player` may deploy a `kind` tile.
    pub fn legal_deploy_cells(&self, player: Player, kind: TileKind) -> Vec<Point> {
        ALL_POINTS
            .iter()
            .copied()
            .filter(|&p| self.can_deploy(player, kind, p))
            .collect()
    }

    /// Every cell the tile on `from` may shift to, in breadth-first order.
    ///
    /// Steps are orthogonal, up to the tile's move range. Occupied cells and
    /// cells where the opponent's threat would capture the tile block
    /// traversal. Safety is judged with the moving tile lifted off the
    /// board, so its own cover and threat never count for or against it.
    /// A rotation-sensitive tile may also stay on `from` and turn,
    /// so `from` itself is listed first for those. Returns an empty list when
    /// `from` is empty or holds another player's tile.
    pub fn legal_shift_destinations(&self, from: Point, player: Player) -> Vec<Point> {
        let Some(tile) = self.tile_at(from) else {
            return Vec::new();
        };
        if tile.owner != player {
            return Vec::new();
        }
        let info = tile.info();
        let mut destinations = Vec::new();
        if info.rotates {
            destinations.push(from);
        }
        if !info.shiftable {
            return destinations;
        }

        let mut lifted = self.cells;
        lifted[from.index()] = None;
        let influence = Influence::compute(&lifted);

        let opponent = player.opponent();
        let mut visited = [false; CELL_COUNT];
        visited[from.index()] = true;
        let mut queue = VecDeque::from([(from, 0u8)]);

        while let Some((point, dist)) = queue.pop_front() {
            if dist >= info.move_range {
                continue;
            }
            for next in point.neighbors() {
                let idx = next.index();
                if visited[idx] {
                    continue;
                }
                visited[idx] = true;
                if !next.is_playable() || self.cells[idx].is_some() {
                    continue;
                }
                let threshold = info.capture_threshold(influence.covered(player, next));
                if influence.threat(opponent, next) >= threshold {
                    continue;
                }
                destinations.push(next);
                queue.push_back((next, dist + 1));
            }
        }

        destinations
    }

    /// Returns true if the tile on `point` meets its capture threshold.
    pub fn is_capturable(&self, point: Point) -> bool {
        let Some(tile) = self.tile_at(point) else {
            return false;
        };
        let covered = self.influence.covered(tile.owner, point);
        let threshold = tile.info().capture_threshold(covered);
        self.influence.threat(tile.owner.opponent(), point) >= threshold
    }

    /// Cells of `player`'s tiles that currently meet their capture threshold.
    pub fn tiles_capturable(&self, player: Player) -> Vec<Point> {
        self.tiles_of(player)
            .map(|(p, _)| p)
            .filter(|&p| self.is_capturable(p))
            .collect()
    }

    /// Sum of zone point values under `player`'s scoring tiles.
    pub fn score_for(&self, player: Player) -> u32 {
        self.tiles_of(player)
            .filter(|(_, t)| !t.info().scores_nothing)
            .map(|(p, _)| p.zone().point_value(player))
            .sum()
    }
}
