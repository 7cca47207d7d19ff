//! Error types for notation parsing, rule checking and history navigation.

use thiserror::Error;

use crate::board::Square;
use crate::constants::Player;

pub type Result<T> = std::result::Result<T, ChessError>;

/// Every recoverable failure the crate reports. A rejected token or illegal
/// move never corrupts the position or the history it was checked against.
#[derive(Debug, Error)]
pub enum ChessError {
    #[error("coordinate ({file}, {rank}) is off the board")]
    OutOfBounds { file: i32, rank: i32 },

    #[error("no piece at {0}")]
    EmptyOrigin(Square),

    #[error("own piece at destination {0}")]
    FriendlyCapture(Square),

    #[error("illegal move: {0}")]
    IllegalGeometry(&'static str),

    #[error("blocked: {0}")]
    Blocked(&'static str),

    #[error("ambiguous notation: {0}")]
    AmbiguousNotation(String),

    #[error("notation insufficient, use explicit coordinates: {0}")]
    UnsupportedNotation(String),

    #[error("unrecognized token: {0}")]
    UnknownToken(String),

    #[error("history boundary: {0}")]
    HistoryBoundary(&'static str),

    #[error("out of turn: expected {expected:?}, got {got:?}")]
    OutOfTurn { expected: Player, got: Player },

    #[error("unknown checkpoint: {0}")]
    UnknownCheckpoint(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid saved position: {0}")]
    InvalidDocument(String),
}

impl ChessError {
    /// Stable machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ChessError::OutOfBounds { .. } => "out_of_bounds",
            ChessError::EmptyOrigin(_) => "empty_origin",
            ChessError::FriendlyCapture(_) => "friendly_capture",
            ChessError::IllegalGeometry(_) => "illegal_geometry",
            ChessError::Blocked(_) => "blocked",
            ChessError::AmbiguousNotation(_) => "ambiguous_notation",
            ChessError::UnsupportedNotation(_) => "unsupported_notation",
            ChessError::UnknownToken(_) => "unknown_token",
            ChessError::HistoryBoundary(_) => "history_boundary",
            ChessError::OutOfTurn { .. } => "out_of_turn",
            ChessError::UnknownCheckpoint(_) => "unknown_checkpoint",
            ChessError::Io(_) => "io",
            ChessError::InvalidDocument(_) => "invalid_document",
        }
    }
}
