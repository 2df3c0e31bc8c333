//! Board representation and tile catalog.
//!
//! Contains the board geometry and zones, the tile catalog, per-cell
//! influence tallies, and the board itself.

pub mod influence;
pub mod point;
pub mod state;
pub mod tile;

pub use influence::Influence;
pub use point::{
    playable_points, Player, Point, Zone, ALL_PLAYERS, ALL_POINTS, BOARD_SIZE, CELL_COUNT, ZONES,
};
pub use state::{Board, CellView};
pub use tile::{
    rotate, rotate_offset, Facing, Offset, Tile, TileId, TileInfo, TileKind, ALL_FACINGS,
    ALL_TILE_KINDS, TILE_INFO, TILE_KIND_COUNT,
};
