//! Record, validate and replay Xiangqi games written in traditional
//! Chinese move notation.

pub mod board;
pub mod constants;
pub mod errors;
pub mod history;
pub mod notation;
pub mod recorder;
pub mod rules;
pub mod tui;

pub use board::{Board, Square, START_FEN};
pub use constants::{Piece, PieceKind, Player};
pub use errors::{ChessError, Result};
pub use history::{History, HistoryNode};
pub use recorder::Recorder;
