//! Persisted snapshot codec.
//!
//! # Responsibility
//! - Encode a board as UTF-8 JSON `{ "tasks": {..}, "columns": [..] }`.
//! - Decode both that shape and the legacy `{ "state": {..}, "version": n }`
//!   envelope written by the browser build of the board.
//!
//! # Invariants
//! - Boards returned by `decode_board` always pass `Board::validate()`.
//! - `parse_board` only checks the shape; the store repairs what it returns.

use crate::model::board::{Board, BoardValidationError};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Invalid(BoardValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed board snapshot: {err}"),
            Self::Invalid(err) => write!(f, "inconsistent board snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<BoardValidationError> for SnapshotError {
    fn from(value: BoardValidationError) -> Self {
        Self::Invalid(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Plain(Board),
    Enveloped {
        state: Board,
        #[allow(dead_code)]
        #[serde(default)]
        version: u32,
    },
}

pub fn encode_board(board: &Board) -> Result<Vec<u8>, SnapshotError> {
    Ok(serde_json::to_vec(board)?)
}

/// Decodes and validates a stored board.
pub fn decode_board(bytes: &[u8]) -> Result<Board, SnapshotError> {
    let board = parse_board(bytes)?;
    board.validate()?;
    Ok(board)
}

/// Decodes either stored shape without checking cross-entity invariants.
pub(crate) fn parse_board(bytes: &[u8]) -> Result<Board, SnapshotError> {
    match serde_json::from_slice::<StoredSnapshot>(bytes) {
        Ok(StoredSnapshot::Plain(board)) => Ok(board),
        Ok(StoredSnapshot::Enveloped { state, .. }) => Ok(state),
        // untagged errors are opaque; re-parse as the plain shape for a
        // precise message.
        Err(_) => Ok(serde_json::from_slice::<Board>(bytes)?),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_board, encode_board, parse_board, SnapshotError};
    use crate::model::board::Board;

    #[test]
    fn legacy_envelope_is_unwrapped() {
        let bytes = br#"{
            "state": {
                "tasks": {
                    "t1": {
                        "id": "t1",
                        "title": "Draft outline",
                        "description": "",
                        "status": "todo",
                        "createdAt": "2024-05-01T09:30:00.000Z"
                    }
                },
                "columns": [
                    { "id": "todo", "title": "To Do", "taskIds": ["t1"] },
                    { "id": "done", "title": "Done", "taskIds": [] }
                ]
            },
            "version": 0
        }"#;

        let board = decode_board(bytes).unwrap();
        assert_eq!(board.columns.len(), 2);
        assert_eq!(board.task("t1").unwrap().title, "Draft outline");
    }

    #[test]
    fn garbage_reports_json_error() {
        let err = decode_board(b"not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[test]
    fn inconsistent_snapshot_is_rejected() {
        let bytes = br#"{
            "tasks": {},
            "columns": [{ "id": "todo", "title": "To Do", "taskIds": ["ghost"] }]
        }"#;
        let err = decode_board(bytes).unwrap_err();
        assert!(matches!(err, SnapshotError::Invalid(_)));

        let parsed = parse_board(bytes).unwrap();
        assert_eq!(parsed.columns[0].task_ids, ["ghost"]);
    }

    #[test]
    fn default_board_encodes_camel_case_columns() {
        let bytes = encode_board(&Board::default_board()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["columns"][1]["id"], "in-progress");
        assert!(json["columns"][0]["taskIds"].as_array().unwrap().is_empty());
        assert!(json["tasks"].as_object().unwrap().is_empty());
    }
}
