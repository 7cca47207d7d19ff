//! Per-move legality rules for each piece kind.
//!
//! Rules here are local to the moving piece: path blocking, palace and river
//! limits, the cannon's screen. Whole-game conditions (check, checkmate,
//! repetition) are out of scope.

use crate::board::{Board, Square};
use crate::constants::{PieceKind, Player};
use crate::errors::{ChessError, Result};

/// Check whether moving the piece at `from` to `to` obeys that piece's
/// movement rule. Pure: the board is only read.
pub fn check_move(board: &Board, from: Square, to: Square) -> Result<()> {
    let (kind, player) = board
        .get(from)
        .parts()
        .ok_or(ChessError::EmptyOrigin(from))?;

    if from == to {
        return Err(ChessError::IllegalGeometry(
            "origin and destination are the same square",
        ));
    }
    if board.get(to).player() == Some(player) {
        return Err(ChessError::FriendlyCapture(to));
    }

    let dx = to.file() as i8 - from.file() as i8;
    let dy = to.rank() as i8 - from.rank() as i8;

    match kind {
        PieceKind::Rook => {
            if dx != 0 && dy != 0 {
                return Err(ChessError::IllegalGeometry(
                    "rook moves along a single file or rank",
                ));
            }
            if count_between(board, from, to) != 0 {
                return Err(ChessError::Blocked("rook path is not clear"));
            }
        }
        PieceKind::Horse => {
            if !matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1)) {
                return Err(ChessError::IllegalGeometry("horse moves in an L-shape"));
            }
            // The leg square sits one orthogonal step toward the longer
            // displacement component.
            let leg = if dx.abs() == 2 {
                Square::at((from.file() as i8 + dx / 2) as u8, from.rank())
            } else {
                Square::at(from.file(), (from.rank() as i8 + dy / 2) as u8)
            };
            if !board_empty(board, leg) {
                return Err(ChessError::Blocked("horse leg is occupied"));
            }
        }
        PieceKind::Elephant => {
            if (dx.abs(), dy.abs()) != (2, 2) {
                return Err(ChessError::IllegalGeometry(
                    "elephant moves exactly two squares diagonally",
                ));
            }
            if !on_own_side(to, player) {
                return Err(ChessError::IllegalGeometry(
                    "elephant cannot cross the river",
                ));
            }
            let eye = Square::at(
                (from.file() as i8 + dx / 2) as u8,
                (from.rank() as i8 + dy / 2) as u8,
            );
            if !board_empty(board, eye) {
                return Err(ChessError::Blocked("elephant eye is occupied"));
            }
        }
        PieceKind::Advisor => {
            if (dx.abs(), dy.abs()) != (1, 1) {
                return Err(ChessError::IllegalGeometry(
                    "advisor moves exactly one square diagonally",
                ));
            }
            if !in_palace(to, player) {
                return Err(ChessError::IllegalGeometry(
                    "advisor must stay inside the palace",
                ));
            }
        }
        PieceKind::King => {
            if !matches!((dx.abs(), dy.abs()), (1, 0) | (0, 1)) {
                return Err(ChessError::IllegalGeometry(
                    "king moves exactly one square orthogonally",
                ));
            }
            if !in_palace(to, player) {
                return Err(ChessError::IllegalGeometry(
                    "king must stay inside the palace",
                ));
            }
        }
        PieceKind::Cannon => {
            if dx != 0 && dy != 0 {
                return Err(ChessError::IllegalGeometry(
                    "cannon moves along a single file or rank",
                ));
            }
            let screens = count_between(board, from, to);
            if board_empty(board, to) {
                if screens != 0 {
                    return Err(ChessError::Blocked("cannon path is not clear"));
                }
            } else if screens != 1 {
                return Err(ChessError::Blocked(
                    "cannon captures over exactly one screen",
                ));
            }
        }
        PieceKind::Pawn => {
            if !matches!((dx.abs(), dy.abs()), (1, 0) | (0, 1)) {
                return Err(ChessError::IllegalGeometry("pawn moves exactly one square"));
            }
            if dy != 0 && dy.signum() != player.forward() {
                return Err(ChessError::IllegalGeometry("pawn never retreats"));
            }
            if dx != 0 && on_own_side(to, player) {
                return Err(ChessError::IllegalGeometry(
                    "pawn cannot traverse before crossing the river",
                ));
            }
        }
    }

    Ok(())
}

/// Boolean wrapper around [`check_move`].
pub fn is_legal(board: &Board, from: Square, to: Square) -> bool {
    check_move(board, from, to).is_ok()
}

fn board_empty(board: &Board, sq: Square) -> bool {
    board.get(sq).player().is_none()
}

/// Count pieces strictly between two squares on a shared file or rank.
fn count_between(board: &Board, from: Square, to: Square) -> usize {
    debug_assert!(from.file() == to.file() || from.rank() == to.rank());
    let mut count = 0;
    if from.file() == to.file() {
        let (lo, hi) = ordered(from.rank(), to.rank());
        for rank in lo + 1..hi {
            if !board_empty(board, Square::at(from.file(), rank)) {
                count += 1;
            }
        }
    } else {
        let (lo, hi) = ordered(from.file(), to.file());
        for file in lo + 1..hi {
            if !board_empty(board, Square::at(file, from.rank())) {
                count += 1;
            }
        }
    }
    count
}

fn ordered(a: u8, b: u8) -> (u8, u8) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The 3x3 palace: files 3-5, ranks 0-2 for Red and 7-9 for Black.
fn in_palace(sq: Square, player: Player) -> bool {
    let file_ok = (3..=5).contains(&sq.file());
    match player {
        Player::Red => file_ok && sq.rank() <= 2,
        Player::Black => file_ok && sq.rank() >= 7,
    }
}

/// Whether a square lies on the given side's own half of the river.
fn on_own_side(sq: Square, player: Player) -> bool {
    match player {
        Player::Red => sq.rank() <= 4,
        Player::Black => sq.rank() >= 5,
    }
}
