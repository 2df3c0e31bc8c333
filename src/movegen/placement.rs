//! Board-move candidates: deploy, shift and rotate.

use crate::board::{Board, Facing, Player, Point, TileKind, ALL_FACINGS};
use crate::notation::Action;
use crate::tile_manager::TileManager;

const UPRIGHT: &[Facing] = &[Facing::Up];

/// Facings worth distinguishing for a kind: all four if it rotates, else up.
fn facings_for(kind: TileKind) -> &'static [Facing] {
    if kind.info().rotates {
        &ALL_FACINGS
    } else {
        UPRIGHT
    }
}

/// Every deploy of a hand tile onto a cell that accepts it.
pub fn deploy_candidates(player: Player, board: &Board, tiles: &TileManager) -> Vec<Action> {
    let mut actions = Vec::new();
    for kind in tiles.hand_kinds(player) {
        for end_point in board.legal_deploy_cells(player, kind) {
            for &facing in facings_for(kind) {
                actions.push(Action::Deploy {
                    tile: kind,
                    end_point,
                    facing,
                });
            }
        }
    }
    actions
}

/// Every shift and in-place rotation of `player`'s tiles.
pub fn shift_candidates(player: Player, board: &Board) -> Vec<Action> {
    let mut actions = Vec::new();
    let owned: Vec<(Point, TileKind, Facing)> = board
        .tiles_of(player)
        .map(|(p, t)| (p, t.kind, t.facing))
        .collect();

    for (from, kind, current) in owned {
        for to in board.legal_shift_destinations(from, player) {
            if to == from {
                for &facing in ALL_FACINGS.iter().filter(|&&f| f != current) {
                    actions.push(Action::Rotate {
                        start_point: from,
                        facing,
                    });
                }
                continue;
            }
            for &facing in facings_for(kind) {
                actions.push(Action::Shift {
                    start_point: from,
                    end_point: to,
                    facing,
                });
            }
        }
    }
    actions
}

/// Bonus-shift destinations for the tile on `from`.
pub fn bonus_candidates(player: Player, from: Point, board: &Board) -> Vec<Action> {
    let Some(kind) = board.tile_at(from).map(|t| t.kind) else {
        return Vec::new();
    };
    let mut actions = Vec::new();
    for to in board.legal_shift_destinations(from, player) {
        if to == from {
            continue;
        }
        for &facing in facings_for(kind) {
            actions.push(Action::BonusShift {
                start_point: from,
                end_point: to,
                facing,
            });
        }
    }
    actions
}
