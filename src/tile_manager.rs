//! Per-player tile containers.
//!
//! Tiles move reserve → hand → board → discard. The board itself lives in
//! `Board`; this module owns the other three containers and the id
//! allocator, so independent games never share sequence state.

use std::fmt;

use crate::board::{Player, Tile, TileId, TileKind, ALL_PLAYERS, ALL_TILE_KINDS};
use crate::error::EngineError;

/// An off-board tile container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Reserve,
    Hand,
    Discard,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Container::Reserve => "reserve",
            Container::Hand => "hand",
            Container::Discard => "discard",
        })
    }
}

/// One player's off-board tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerTiles {
    reserve: Vec<Tile>,
    hand: Vec<Tile>,
    discard: Vec<Tile>,
}

impl PlayerTiles {
    fn container(&self, container: Container) -> &[Tile] {
        match container {
            Container::Reserve => &self.reserve,
            Container::Hand => &self.hand,
            Container::Discard => &self.discard,
        }
    }
}

/// Owns every tile that is not on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileManager {
    players: [PlayerTiles; 2],
    next_id: u16,
}

impl Default for TileManager {
    fn default() -> Self {
        TileManager::new()
    }
}

impl TileManager {
    /// Creates full reserves for both players from the catalog supply.
    pub fn new() -> Self {
        let mut manager = TileManager {
            players: [PlayerTiles::default(), PlayerTiles::default()],
            next_id: 0,
        };
        for player in ALL_PLAYERS {
            for kind in ALL_TILE_KINDS {
                for _ in 0..kind.info().supply {
                    let tile = Tile::new(manager.allocate_id(), kind, player);
                    manager.players[player.index()].reserve.push(tile);
                }
            }
        }
        manager
    }

    fn allocate_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Moves one `kind` tile from `player`'s reserve into their hand.
    pub fn draw_from_reserve(
        &mut self,
        player: Player,
        kind: TileKind,
    ) -> Result<Tile, EngineError> {
        let tiles = &mut self.players[player.index()];
        let tile = take_kind(&mut tiles.reserve, kind).ok_or(EngineError::EmptyContainer {
            player,
            kind,
            container: Container::Reserve,
        })?;
        tiles.hand.push(tile);
        Ok(tile)
    }

    /// Removes one `kind` tile from `player`'s hand for deployment.
    pub fn take_from_hand(&mut self, player: Player, kind: TileKind) -> Result<Tile, EngineError> {
        take_kind(&mut self.players[player.index()].hand, kind).ok_or(EngineError::EmptyContainer {
            player,
            kind,
            container: Container::Hand,
        })
    }

    /// Retires a captured tile for good.
    pub fn send_to_discard(&mut self, mut tile: Tile) {
        tile.just_placed = false;
        self.players[tile.owner.index()].discard.push(tile);
    }

    /// Tiles in `player`'s reserve.
    pub fn reserve(&self, player: Player) -> &[Tile] {
        &self.players[player.index()].reserve
    }

    /// Tiles in `player`'s hand, in draw order.
    pub fn hand(&self, player: Player) -> &[Tile] {
        &self.players[player.index()].hand
    }

    /// Tiles `player` has lost.
    pub fn discard(&self, player: Player) -> &[Tile] {
        &self.players[player.index()].discard
    }

    pub fn hand_size(&self, player: Player) -> usize {
        self.players[player.index()].hand.len()
    }

    /// Number of `kind` tiles in one of `player`'s containers.
    pub fn count(&self, player: Player, container: Container, kind: TileKind) -> usize {
        self.players[player.index()]
            .container(container)
            .iter()
            .filter(|t| t.kind == kind)
            .count()
    }

    /// Distinct kinds left in `player`'s reserve, in catalog order.
    pub fn reserve_kinds(&self, player: Player) -> Vec<TileKind> {
        distinct_kinds(self.reserve(player))
    }

    /// Distinct kinds in `player`'s hand, in catalog order.
    pub fn hand_kinds(&self, player: Player) -> Vec<TileKind> {
        distinct_kinds(self.hand(player))
    }
}

fn take_kind(tiles: &mut Vec<Tile>, kind: TileKind) -> Option<Tile> {
    let pos = tiles.iter().position(|t| t.kind == kind)?;
    Some(tiles.remove(pos))
}

fn distinct_kinds(tiles: &[Tile]) -> Vec<TileKind> {
    ALL_TILE_KINDS
        .iter()
        .copied()
        .filter(|&k| tiles.iter().any(|t| t.kind == k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_manager_fills_reserves() {
        let manager = TileManager::new();
        for player in ALL_PLAYERS {
            assert_eq!(manager.reserve(player).len(), 23);
            assert!(manager.hand(player).is_empty());
            assert!(manager.discard(player).is_empty());
            assert_eq!(manager.reserve_kinds(player), ALL_TILE_KINDS.to_vec());
        }
    }

    #[test]
    fn ids_are_unique_per_game() {
        let manager = TileManager::new();
        let mut ids: Vec<TileId> = ALL_PLAYERS
            .iter()
            .flat_map(|&p| manager.reserve(p).iter().map(|t| t.id))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 46);

        // A second game starts its own sequence.
        let other = TileManager::new();
        assert_eq!(other.reserve(Player::Host)[0].id, TileId(0));
    }

    #[test]
    fn draw_moves_reserve_to_hand() {
        let mut manager = TileManager::new();
        let tile = manager.draw_from_reserve(Player::Host, TileKind::Air).unwrap();
        assert_eq!(tile.kind, TileKind::Air);
        assert_eq!(tile.owner, Player::Host);
        assert_eq!(manager.count(Player::Host, Container::Reserve, TileKind::Air), 1);
        assert_eq!(manager.count(Player::Host, Container::Hand, TileKind::Air), 1);
        assert_eq!(manager.count(Player::Guest, Container::Reserve, TileKind::Air), 2);
    }

    #[test]
    fn draw_from_exhausted_reserve_fails() {
        let mut manager = TileManager::new();
        manager.draw_from_reserve(Player::Guest, TileKind::Earth).unwrap();
        manager.draw_from_reserve(Player::Guest, TileKind::Earth).unwrap();
        let err = manager.draw_from_reserve(Player::Guest, TileKind::Earth).unwrap_err();
        assert_eq!(
            err,
            EngineError::EmptyContainer {
                player: Player::Guest,
                kind: TileKind::Earth,
                container: Container::Reserve,
            }
        );
        assert!(!manager.reserve_kinds(Player::Guest).contains(&TileKind::Earth));
    }

    #[test]
    fn take_from_hand_requires_the_kind() {
        let mut manager = TileManager::new();
        assert!(manager.take_from_hand(Player::Host, TileKind::Sai).is_err());
        manager.draw_from_reserve(Player::Host, TileKind::Sai).unwrap();
        let tile = manager.take_from_hand(Player::Host, TileKind::Sai).unwrap();
        assert_eq!(tile.kind, TileKind::Sai);
        assert_eq!(manager.hand_size(Player::Host), 0);
    }

    #[test]
    fn discard_is_per_owner() {
        let mut manager = TileManager::new();
        let tile = manager.draw_from_reserve(Player::Guest, TileKind::Bow).unwrap();
        let tile = manager.take_from_hand(Player::Guest, tile.kind).unwrap();
        manager.send_to_discard(tile);
        assert_eq!(manager.count(Player::Guest, Container::Discard, TileKind::Bow), 1);
        assert!(manager.discard(Player::Host).is_empty());
    }

    #[test]
    fn hand_kinds_are_distinct() {
        let mut manager = TileManager::new();
        manager.draw_from_reserve(Player::Host, TileKind::Wood).unwrap();
        manager.draw_from_reserve(Player::Host, TileKind::Sai).unwrap();
        manager.draw_from_reserve(Player::Host, TileKind::Sai).unwrap();
        assert_eq!(manager.hand_kinds(Player::Host), vec![TileKind::Sai, TileKind::Wood]);
    }
}
