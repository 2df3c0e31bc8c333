//! Tile catalog and tile instances.
//!
//! Each `TileKind` maps to an immutable `TileInfo` row in a compile-time
//! table indexed by the enum discriminant. Influence patterns are written for
//! the canonical "facing up" orientation and rotated on demand.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::point::Player;

/// Relative `(drow, dcol)` offset; negative `drow` points toward row 0.
pub type Offset = (i8, i8);

/// Direction a rotation-sensitive tile points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Facing {
    #[default]
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

/// All facings, clockwise from up.
pub const ALL_FACINGS: [Facing; 4] = [Facing::Up, Facing::Right, Facing::Down, Facing::Left];

impl Facing {
    /// Quarter turns clockwise from up.
    pub const fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// Returns the lowercase wire name.
    pub const fn name(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Right => "right",
            Facing::Down => "down",
            Facing::Left => "left",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotates a single offset clockwise by `facing`.
pub const fn rotate_offset(offset: Offset, facing: Facing) -> Offset {
    let (mut dr, mut dc) = offset;
    let mut turns = facing.quarter_turns();
    while turns > 0 {
        let next = (dc, -dr);
        dr = next.0;
        dc = next.1;
        turns -= 1;
    }
    (dr, dc)
}

/// Rotates a canonical pattern to `facing`. Computed fresh on every call.
pub fn rotate(offsets: &[Offset], facing: Facing) -> impl Iterator<Item = Offset> + '_ {
    offsets.iter().map(move |&o| rotate_offset(o, facing))
}

/// The number of tile kinds in the catalog.
pub const TILE_KIND_COUNT: usize = 9;

/// A tile type from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TileKind {
    Sai = 0,
    Sword = 1,
    Bow = 2,
    Lotus = 3,
    Fire = 4,
    Water = 5,
    Earth = 6,
    Air = 7,
    Wood = 8,
}

/// All tile kinds in catalog order.
pub const ALL_TILE_KINDS: [TileKind; TILE_KIND_COUNT] = [
    TileKind::Sai,
    TileKind::Sword,
    TileKind::Bow,
    TileKind::Lotus,
    TileKind::Fire,
    TileKind::Water,
    TileKind::Earth,
    TileKind::Air,
    TileKind::Wood,
];

impl TileKind {
    /// Returns the catalog row for this kind.
    pub fn info(self) -> &'static TileInfo {
        &TILE_INFO[self as usize]
    }

    /// Returns the lowercase wire name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Threat pattern as projected with the given facing.
    pub fn threat_offsets(self, facing: Facing) -> impl Iterator<Item = Offset> {
        let info = self.info();
        rotate(info.threat, info.effective_facing(facing))
    }

    /// Cover pattern as projected with the given facing.
    pub fn cover_offsets(self, facing: Facing) -> impl Iterator<Item = Offset> {
        let info = self.info();
        rotate(info.cover, info.effective_facing(facing))
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static definition of a tile kind, shared by every instance.
#[derive(Debug)]
pub struct TileInfo {
    pub name: &'static str,
    /// Copies of this kind in each player's starting reserve.
    pub supply: u8,
    /// Maximum orthogonal steps per shift.
    pub move_range: u8,
    pub shiftable: bool,
    /// Patterns follow the tile's facing.
    pub rotates: bool,
    pub threat: &'static [Offset],
    pub cover: &'static [Offset],
    /// Threat also counts against the owner's own tiles.
    pub threatens_all: bool,
    /// Captured at threat 1 instead of 2.
    pub fragile: bool,
    /// The opponent may not deploy where this tile threatens.
    pub blocks_deploy: bool,
    /// May be deployed on any empty playable cell.
    pub deploy_anywhere: bool,
    pub scores_nothing: bool,
    /// Grants one extra shift right after deployment.
    pub bonus_shift: bool,
}

impl TileInfo {
    /// Opponent threat at which a tile of this kind is captured.
    pub const fn capture_threshold(&self, covered: bool) -> u8 {
        let base = if self.fragile { 1 } else { 2 };
        if covered {
            base + 1
        } else {
            base
        }
    }

    /// The facing patterns are projected with; fixed tiles always face up.
    pub const fn effective_facing(&self, facing: Facing) -> Facing {
        if self.rotates {
            facing
        } else {
            Facing::Up
        }
    }
}

const ORTHOGONAL: &[Offset] = &[(-1, 0), (0, 1), (1, 0), (0, -1)];
const DIAGONAL: &[Offset] = &[(-1, -1), (-1, 1), (1, 1), (1, -1)];
const SURROUNDING: &[Offset] = &[
    (-1, -1), (-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (1, -1), (0, -1),
];

const PLAIN: TileInfo = TileInfo {
    name: "",
    supply: 0,
    move_range: 0,
    shiftable: false,
    rotates: false,
    threat: &[],
    cover: &[],
    threatens_all: false,
    fragile: false,
    blocks_deploy: false,
    deploy_anywhere: false,
    scores_nothing: false,
    bonus_shift: false,
};

/// Compile-time catalog: index by `TileKind as usize`.
#[rustfmt::skip]
pub static TILE_INFO: [TileInfo; TILE_KIND_COUNT] = [
    TileInfo { name: "sai", supply: 3, move_range: 2, shiftable: true, threat: DIAGONAL, ..PLAIN },
    TileInfo { name: "sword", supply: 3, move_range: 1, shiftable: true, threat: ORTHOGONAL, ..PLAIN },
    TileInfo { name: "bow", supply: 3, move_range: 1, shiftable: true, rotates: true, threat: &[(-2, 0), (-3, 0)], ..PLAIN },
    TileInfo { name: "lotus", supply: 2, move_range: 2, shiftable: true, cover: SURROUNDING, scores_nothing: true, ..PLAIN },
    TileInfo { name: "fire", supply: 2, move_range: 1, shiftable: true, rotates: true, threat: &[(-1, -1), (-1, 0), (-1, 1), (-2, 0)], threatens_all: true, ..PLAIN },
    TileInfo { name: "water", supply: 3, move_range: 2, shiftable: true, threat: &[(-2, 0), (0, 2), (2, 0), (0, -2)], cover: ORTHOGONAL, blocks_deploy: true, ..PLAIN },
    TileInfo { name: "earth", supply: 2, cover: SURROUNDING, deploy_anywhere: true, ..PLAIN },
    TileInfo { name: "air", supply: 2, move_range: 3, shiftable: true, threat: &[(-1, 0), (1, 0)], fragile: true, bonus_shift: true, ..PLAIN },
    TileInfo { name: "wood", supply: 3, move_range: 1, shiftable: true, threat: &[(0, -1), (0, 1)], cover: &[(-1, 0), (1, 0)], ..PLAIN },
];

/// Sequence id of a tile instance, unique within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u16);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tile instance. Owned by exactly one container at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub owner: Player,
    pub facing: Facing,
    /// Set on deployment, cleared when the next action move starts.
    pub just_placed: bool,
}

impl Tile {
    /// Creates a fresh, upright tile.
    pub const fn new(id: TileId, kind: TileKind, owner: Player) -> Self {
        Tile {
            id,
            kind,
            owner,
            facing: Facing::Up,
            just_placed: false,
        }
    }

    /// Returns the catalog row for this tile's kind.
    pub fn info(&self) -> &'static TileInfo {
        self.kind.info()
    }
}
