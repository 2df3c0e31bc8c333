//! Move records.
//!
//! A record is an immutable, structurally comparable description of one
//! applied decision. The wire form is a flat JSON object:
//! `{"moveNum":3,"player":"HOST","moveType":"deploy","tile":"sword",...}`.

use serde::{Deserialize, Serialize};

use crate::board::{Facing, Player, Point, TileKind};

/// One entry of the move log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub move_num: u32,
    pub player: Player,
    #[serde(flatten)]
    pub action: Action,
}

/// What a move does, with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "moveType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// Opening selection: `{"moveType":"selectForHand","tiles":["sai","bow"]}`
    SelectForHand { tiles: Vec<TileKind> },

    /// Hand → board: `{"moveType":"deploy","tile":"bow","endPoint":{..},"facing":"up"}`
    Deploy {
        tile: TileKind,
        end_point: Point,
        facing: Facing,
    },

    /// Board → board within range. Equal points mean rotate in place.
    Shift {
        start_point: Point,
        end_point: Point,
        facing: Facing,
    },

    /// Turn a rotation-sensitive tile without moving it.
    Rotate { start_point: Point, facing: Facing },

    /// Spend the turn moving one tile reserve → hand.
    Draw { tile: TileKind },

    /// Take one compensating draw owed for a capture.
    CaptureDraw { tile: TileKind },

    /// The extra shift a freshly deployed bonus tile may take.
    BonusShift {
        start_point: Point,
        end_point: Point,
        facing: Facing,
    },

    /// Decline a bonus shift, or skip a turn with no legal move.
    Pass,
}

impl Action {
    /// Returns the wire `moveType` name.
    pub const fn name(&self) -> &'static str {
        match self {
            Action::SelectForHand { .. } => "selectForHand",
            Action::Deploy { .. } => "deploy",
            Action::Shift { .. } => "shift",
            Action::Rotate { .. } => "rotate",
            Action::Draw { .. } => "draw",
            Action::CaptureDraw { .. } => "captureDraw",
            Action::BonusShift { .. } => "bonusShift",
            Action::Pass => "pass",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: u8, col: u8) -> Point {
        Point::new(row, col).unwrap()
    }

    #[test]
    fn deploy_wire_format() {
        let record = MoveRecord {
            move_num: 3,
            player: Player::Host,
            action: Action::Deploy {
                tile: TileKind::Bow,
                end_point: p(12, 4),
                facing: Facing::Right,
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"moveNum":3,"player":"HOST","moveType":"deploy","tile":"bow","endPoint":{"row":12,"col":4},"facing":"right"}"#
        );
        let back: MoveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn pass_carries_no_payload() {
        let record = MoveRecord {
            move_num: 0,
            player: Player::Guest,
            action: Action::Pass,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"moveNum":0,"player":"GUEST","moveType":"pass"}"#);
    }

    #[test]
    fn select_lists_kinds() {
        let json = r#"{"moveNum":1,"player":"GUEST","moveType":"selectForHand","tiles":["lotus","air"]}"#;
        let record: MoveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.action,
            Action::SelectForHand {
                tiles: vec![TileKind::Lotus, TileKind::Air]
            }
        );
    }

    #[test]
    fn unknown_move_type_is_rejected() {
        let json = r#"{"moveNum":1,"player":"GUEST","moveType":"teleport"}"#;
        assert!(serde_json::from_str::<MoveRecord>(json).is_err());
    }
}
