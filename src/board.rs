//! Board state in first-quadrant coordinates.
//!
//! The origin is the lower-left corner; Red's back rank is rank 0 and Black's
//! is rank 9, independent of how a front end chooses to display the board.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{Piece, PieceKind, Player};
use crate::errors::{ChessError, Result};

pub const FILE_COUNT: u8 = 9;
pub const RANK_COUNT: u8 = 10;

/// Piece-placement field of the standard opening position, listed from
/// rank 9 (Black's back rank) down to rank 0.
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

/// A validated board coordinate: file 0-8, rank 0-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Result<Square> {
        if file >= FILE_COUNT || rank >= RANK_COUNT {
            return Err(ChessError::OutOfBounds {
                file: file as i32,
                rank: rank as i32,
            });
        }
        Ok(Square { file, rank })
    }

    /// Construct a square from coordinates known to be valid, such as
    /// literals in tables and tests. Panics on an out-of-range argument.
    pub const fn at(file: u8, rank: u8) -> Square {
        assert!(file < FILE_COUNT && rank < RANK_COUNT);
        Square { file, rank }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub(crate) fn index(self) -> usize {
        self.rank as usize * FILE_COUNT as usize + self.file as usize
    }

    pub(crate) fn from_index(idx: usize) -> Square {
        Square {
            file: (idx % FILE_COUNT as usize) as u8,
            rank: (idx / FILE_COUNT as usize) as u8,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

/// A full board position: one piece (or `Empty`) per square.
///
/// Positions handed to the history are never mutated again; deriving the
/// next position goes through [`Board::with_move`], which returns a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Piece; 90],
}

// Serialized form: a flat dictionary of "file,rank" keys to FEN characters.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct SavedBoard {
    pieces: BTreeMap<String, char>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [Piece::Empty; 90],
        }
    }

    /// The standard opening position.
    pub fn start() -> Self {
        Self::from_fen(START_FEN).expect("start position FEN is valid")
    }

    /// Parse the piece-placement field of a FEN string. Anything after the
    /// first whitespace (side to move, counters) is ignored.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let layout = fen
            .split_whitespace()
            .next()
            .ok_or_else(|| ChessError::InvalidDocument("empty FEN".to_string()))?;

        let mut board = Board::empty();
        let mut rank = RANK_COUNT as i32 - 1;
        let mut file = 0i32;
        for ch in layout.chars() {
            if ch == '/' {
                rank -= 1;
                file = 0;
            } else if let Some(digit) = ch.to_digit(10) {
                file += digit as i32;
            } else {
                let piece = Piece::from_fen_char(ch)
                    .ok_or_else(|| ChessError::InvalidDocument(format!("bad FEN char {ch:?}")))?;
                if rank < 0 || file >= FILE_COUNT as i32 {
                    return Err(ChessError::OutOfBounds { file, rank });
                }
                board.place(Square::at(file as u8, rank as u8), piece);
                file += 1;
            }
        }
        Ok(board)
    }

    /// Emit the piece-placement field, ranks 9 down to 0.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..RANK_COUNT).rev() {
            let mut empty_count = 0;
            for file in 0..FILE_COUNT {
                let piece = self.get(Square::at(file, rank));
                if piece == Piece::Empty {
                    empty_count += 1;
                } else {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char());
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }

    pub fn get(&self, sq: Square) -> Piece {
        self.squares[sq.index()]
    }

    /// Put a piece on a square while setting a position up. Committed
    /// positions are never edited this way; moves go through `with_move`.
    pub fn place(&mut self, sq: Square, piece: Piece) {
        if let Some((PieceKind::King, player)) = piece.parts() {
            debug_assert!(
                self.pieces_of(PieceKind::King, player).is_empty(),
                "second {player:?} king placed at {sq}"
            );
        }
        self.squares[sq.index()] = piece;
    }

    pub fn remove(&mut self, sq: Square) {
        self.squares[sq.index()] = Piece::Empty;
    }

    /// All squares holding a piece of the given kind and side, in
    /// rank-major order from rank 0 upward.
    pub fn pieces_of(&self, kind: PieceKind, player: Player) -> Vec<Square> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.parts() == Some((kind, player)))
            .map(|(idx, _)| Square::from_index(idx))
            .collect()
    }

    /// Derive the position after relocating the piece at `from` to `to`,
    /// capturing whatever stood there. No rule checking happens here; the
    /// caller validates legality first.
    pub fn with_move(&self, from: Square, to: Square) -> Result<Board> {
        let piece = self.get(from);
        if piece == Piece::Empty {
            return Err(ChessError::EmptyOrigin(from));
        }
        let mut next = self.clone();
        next.squares[from.index()] = Piece::Empty;
        next.squares[to.index()] = piece;
        Ok(next)
    }

    // --- Persistence ---

    /// Dictionary form: "file,rank" keys mapping to FEN characters.
    pub fn to_dict(&self) -> BTreeMap<String, char> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, piece)| **piece != Piece::Empty)
            .map(|(idx, piece)| {
                let sq = Square::from_index(idx);
                (format!("{},{}", sq.file(), sq.rank()), piece.to_fen_char())
            })
            .collect()
    }

    pub fn from_dict(dict: &BTreeMap<String, char>) -> Result<Board> {
        let mut board = Board::empty();
        for (key, ch) in dict {
            let (file, rank) = key
                .split_once(',')
                .and_then(|(f, r)| Some((f.trim().parse().ok()?, r.trim().parse().ok()?)))
                .ok_or_else(|| ChessError::InvalidDocument(format!("bad key {key:?}")))?;
            let piece = Piece::from_fen_char(*ch)
                .ok_or_else(|| ChessError::InvalidDocument(format!("bad piece {ch:?}")))?;
            board.place(Square::new(file, rank)?, piece);
        }
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String> {
        let doc = SavedBoard {
            pieces: self.to_dict(),
        };
        serde_json::to_string_pretty(&doc).map_err(|e| ChessError::InvalidDocument(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Board> {
        let doc: SavedBoard =
            serde_json::from_str(json).map_err(|e| ChessError::InvalidDocument(e.to_string()))?;
        Board::from_dict(&doc.pieces)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<Board> {
        Board::from_json(&fs::read_to_string(path)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  +-------------------+")?;
        for rank in (0..RANK_COUNT).rev() {
            write!(f, "{} | ", rank)?;
            for file in 0..FILE_COUNT {
                write!(f, "{} ", self.get(Square::at(file, rank)).to_fen_char())?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-------------------+")?;
        write!(f, "    0 1 2 3 4 5 6 7 8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_bounds() {
        assert!(Square::new(8, 9).is_ok());
        assert!(matches!(
            Square::new(9, 0),
            Err(ChessError::OutOfBounds { .. })
        ));
        assert!(matches!(
            Square::new(0, 10),
            Err(ChessError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn square_index_round_trip() {
        for idx in 0..90 {
            assert_eq!(Square::from_index(idx).index(), idx);
        }
    }

    #[test]
    fn start_position_layout() {
        let board = Board::start();
        assert_eq!(board.get(Square::at(4, 0)), Piece::RKing);
        assert_eq!(board.get(Square::at(4, 9)), Piece::BKing);
        assert_eq!(board.get(Square::at(7, 2)), Piece::RCannon);
        assert_eq!(board.get(Square::at(1, 7)), Piece::BCannon);
        assert_eq!(board.get(Square::at(0, 3)), Piece::RPawn);
        assert_eq!(board.get(Square::at(8, 6)), Piece::BPawn);
        assert_eq!(board.get(Square::at(4, 4)), Piece::Empty);
    }

    #[test]
    fn fen_round_trip() {
        let board = Board::start();
        assert_eq!(board.to_fen(), START_FEN);
        assert_eq!(Board::from_fen(&board.to_fen()).unwrap(), board);

        // FEN with trailing fields parses the same.
        let full = format!("{START_FEN} w - - 0 1");
        assert_eq!(Board::from_fen(&full).unwrap(), board);
    }

    #[test]
    fn fen_rejects_garbage() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("xyz!").is_err());
    }

    #[test]
    fn with_move_is_immutable() {
        let board = Board::start();
        let next = board
            .with_move(Square::at(7, 2), Square::at(4, 2))
            .unwrap();
        assert_eq!(board.get(Square::at(7, 2)), Piece::RCannon);
        assert_eq!(next.get(Square::at(7, 2)), Piece::Empty);
        assert_eq!(next.get(Square::at(4, 2)), Piece::RCannon);
    }

    #[test]
    fn with_move_captures() {
        let mut board = Board::empty();
        board.place(Square::at(0, 0), Piece::RRook);
        board.place(Square::at(0, 5), Piece::BPawn);
        let next = board.with_move(Square::at(0, 0), Square::at(0, 5)).unwrap();
        assert_eq!(next.get(Square::at(0, 5)), Piece::RRook);
        assert_eq!(next.pieces_of(PieceKind::Pawn, Player::Black), vec![]);
    }

    #[test]
    fn with_move_requires_a_piece() {
        let board = Board::empty();
        assert!(matches!(
            board.with_move(Square::at(0, 0), Square::at(0, 1)),
            Err(ChessError::EmptyOrigin(_))
        ));
    }

    #[test]
    fn pieces_of_finds_both_sides() {
        let board = Board::start();
        assert_eq!(
            board.pieces_of(PieceKind::Cannon, Player::Red),
            vec![Square::at(1, 2), Square::at(7, 2)]
        );
        assert_eq!(board.pieces_of(PieceKind::Pawn, Player::Black).len(), 5);
    }

    #[test]
    fn dict_round_trip() {
        let board = Board::start();
        let dict = board.to_dict();
        assert_eq!(dict.get("4,0"), Some(&'K'));
        assert_eq!(Board::from_dict(&dict).unwrap(), board);
    }

    #[test]
    fn json_round_trip() {
        let board = Board::start();
        let json = board.to_json().unwrap();
        assert_eq!(Board::from_json(&json).unwrap(), board);
    }

    #[test]
    fn json_rejects_bad_documents() {
        assert!(Board::from_json("not json").is_err());
        assert!(Board::from_json(r#"{"9,0":"K"}"#).is_err());
        assert!(Board::from_json(r#"{"0,0":"x"}"#).is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let board = Board::start();
        let path = std::env::temp_dir().join("chessnote_board_test.json");
        board.save_json_file(&path).unwrap();
        assert_eq!(Board::load_json_file(&path).unwrap(), board);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn display_draws_the_frame() {
        let text = Board::start().to_string();
        assert!(text.contains("+-------------------+"));
        assert!(text.contains("0 | R N B A K A B N R |"));
        assert!(text.contains("9 | r n b a k a b n r |"));
    }
}
