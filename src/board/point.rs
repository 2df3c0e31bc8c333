//! Board geometry for the Paiko board.
//!
//! The board is a 15x15 grid with the three cells nearest each corner cut
//! away. Every cell carries a zone classification, stored in a compile-time
//! table indexed by `Point::index()`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of the board grid.
pub const BOARD_SIZE: usize = 15;

/// Number of cells in the grid, including non-playable ones.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Player {
    Host,
    Guest,
}

/// Both players, host first.
pub const ALL_PLAYERS: [Player; 2] = [Player::Host, Player::Guest];

impl Player {
    /// Returns the other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::Host => Player::Guest,
            Player::Guest => Player::Host,
        }
    }

    /// Index used by the per-player tables (host 0, guest 1).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the uppercase wire name.
    pub const fn name(self) -> &'static str {
        match self {
            Player::Host => "HOST",
            Player::Guest => "GUEST",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zone classification of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Outside the board outline; never occupied.
    NonPlayable,
    /// On the board, but only deploy-anywhere tiles may be deployed here.
    BlackedOut,
    HostTerritory,
    GuestTerritory,
    Middle,
    Neutral,
}

impl Zone {
    /// Returns the player whose home territory this zone is, if any.
    pub const fn territory_of(self) -> Option<Player> {
        match self {
            Zone::HostTerritory => Some(Player::Host),
            Zone::GuestTerritory => Some(Player::Guest),
            _ => None,
        }
    }

    /// Returns true if tiles may stand on cells of this zone.
    pub const fn is_playable(self) -> bool {
        !matches!(self, Zone::NonPlayable)
    }

    /// Points a tile owned by `owner` earns while standing in this zone.
    ///
    /// Opponent territory is worth more than the middle, which is worth more
    /// than neutral ground. A player's own territory scores nothing.
    pub fn point_value(self, owner: Player) -> u32 {
        match self {
            Zone::NonPlayable => 0,
            Zone::BlackedOut | Zone::Neutral => 1,
            Zone::Middle => 2,
            Zone::HostTerritory | Zone::GuestTerritory => {
                if self.territory_of() == Some(owner) {
                    0
                } else {
                    3
                }
            }
        }
    }
}

/// A cell on the board, addressed by row (0 at the top) and column.
///
/// A `Point` is always inside the 15x15 grid; it may still be non-playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PointRepr")]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

/// Unchecked wire form of a point, validated on the way in.
#[derive(Deserialize)]
struct PointRepr {
    row: u8,
    col: u8,
}

impl TryFrom<PointRepr> for Point {
    type Error = String;

    fn try_from(repr: PointRepr) -> Result<Self, Self::Error> {
        Point::new(repr.row, repr.col)
            .ok_or_else(|| format!("point ({}, {}) is outside the board", repr.row, repr.col))
    }
}

/// Orthogonal step offsets, clockwise from up.
const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

impl Point {
    /// Creates a point, or None if it lies outside the grid.
    pub const fn new(row: u8, col: u8) -> Option<Point> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Point { row, col })
        } else {
            None
        }
    }

    /// Flat index into per-cell tables.
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// Inverse of `index`. `idx` must be below `CELL_COUNT`.
    pub const fn from_index(idx: usize) -> Point {
        Point {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    /// Returns the point displaced by `(drow, dcol)`, or None off the grid.
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Point> {
        let row = i16::from(self.row) + i16::from(drow);
        let col = i16::from(self.col) + i16::from(dcol);
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        Point::new(row, col)
    }

    /// Orthogonal neighbours that lie on the grid.
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        ORTHOGONAL
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// Zone classification of this cell.
    pub fn zone(self) -> Zone {
        ZONES[self.index()]
    }

    /// Returns true if a tile may stand here.
    pub fn is_playable(self) -> bool {
        self.zone().is_playable()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

const fn edge_distance(v: usize) -> usize {
    let mirrored = BOARD_SIZE - 1 - v;
    if v < mirrored {
        v
    } else {
        mirrored
    }
}

const fn zone_at(row: usize, col: usize) -> Zone {
    if edge_distance(row) + edge_distance(col) < 2 {
        return Zone::NonPlayable;
    }
    if row == 7 && (col == 0 || col == 7 || col == 14) {
        return Zone::BlackedOut;
    }
    if row <= 4 {
        Zone::GuestTerritory
    } else if row >= 10 {
        Zone::HostTerritory
    } else if col >= 5 && col <= 9 {
        Zone::Middle
    } else {
        Zone::Neutral
    }
}

const fn build_zones() -> [Zone; CELL_COUNT] {
    let mut zones = [Zone::NonPlayable; CELL_COUNT];
    let mut i = 0;
    while i < CELL_COUNT {
        zones[i] = zone_at(i / BOARD_SIZE, i % BOARD_SIZE);
        i += 1;
    }
    zones
}

const fn build_points() -> [Point; CELL_COUNT] {
    let mut points = [Point { row: 0, col: 0 }; CELL_COUNT];
    let mut i = 0;
    while i < CELL_COUNT {
        points[i] = Point::from_index(i);
        i += 1;
    }
    points
}

/// Compile-time zone table: index by `Point::index()`.
pub static ZONES: [Zone; CELL_COUNT] = build_zones();

/// Every grid cell in index order, playable or not.
pub static ALL_POINTS: [Point; CELL_COUNT] = build_points();

/// Iterates the cells a tile may stand on.
pub fn playable_points() -> impl Iterator<Item = Point> {
    ALL_POINTS.iter().copied().filter(|p| p.is_playable())
}
