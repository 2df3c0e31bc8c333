//! The move log and its single-string encoding.
//!
//! A full game is a JSON array of move records. Encoding is canonical
//! (compact, fixed field order), so decoding and re-encoding a string the
//! engine produced yields the same bytes.

use serde_json::Value;
use thiserror::Error;

use super::record::{Action, MoveRecord};
use crate::board::Player;

/// Errors that can occur when encoding or decoding a move log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("notation is not a JSON array of records: {0}")]
    Syntax(String),

    #[error("record {index} is malformed: {message}")]
    MalformedRecord { index: usize, message: String },

    #[error("failed to encode notation: {0}")]
    Encode(String),
}

/// Ordered list of applied move records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notation {
    records: Vec<MoveRecord>,
}

impl Notation {
    /// Creates an empty log.
    pub fn new() -> Self {
        Notation::default()
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Move number the next appended record must carry.
    pub fn next_move_num(&self) -> u32 {
        u32::try_from(self.records.len()).unwrap_or(u32::MAX)
    }

    /// Builds the record that would be appended next for `player`.
    pub fn next_record(&self, player: Player, action: Action) -> MoveRecord {
        MoveRecord {
            move_num: self.next_move_num(),
            player,
            action,
        }
    }

    /// Appends an applied record.
    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    /// Removes and returns the most recent record.
    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    /// Encodes the whole log as one JSON array string.
    pub fn encode(&self) -> Result<String, NotationError> {
        serde_json::to_string(&self.records).map_err(|e| NotationError::Encode(e.to_string()))
    }

    /// Decodes a log, failing on the first malformed record.
    pub fn decode(s: &str) -> Result<Notation, NotationError> {
        match Notation::decode_prefix(s) {
            (notation, None) => Ok(notation),
            (_, Some(err)) => Err(err),
        }
    }

    /// Decodes as many leading records as are well formed.
    ///
    /// Returns the well-formed prefix together with the error that stopped
    /// decoding, if any. A string that is not a JSON array yields an empty
    /// prefix.
    pub fn decode_prefix(s: &str) -> (Notation, Option<NotationError>) {
        let values: Vec<Value> = match serde_json::from_str(s) {
            Ok(v) => v,
            Err(e) => return (Notation::new(), Some(NotationError::Syntax(e.to_string()))),
        };

        let mut notation = Notation::new();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<MoveRecord>(value) {
                Ok(record) => notation.push(record),
                Err(e) => {
                    let err = NotationError::MalformedRecord {
                        index,
                        message: e.to_string(),
                    };
                    return (notation, Some(err));
                }
            }
        }
        (notation, None)
    }
}

impl FromIterator<MoveRecord> for Notation {
    fn from_iter<I: IntoIterator<Item = MoveRecord>>(iter: I) -> Self {
        Notation {
            records: iter.into_iter().collect(),
        }
    }
}
