//! Chinese move notation resolution.
//!
//! Tokens are four characters: `<piece><file><operator><argument>`, or
//! `<qualifier><piece><operator><argument>` when several pieces of one kind
//! share a file. Red writes its numerals in Chinese (一..九) counting files
//! from its own right (board file 8); Black writes Arabic digits (1..9)
//! counting from its own right (board file 0). The numeral set, not the
//! character variant of the piece name, decides which side a token belongs
//! to. Resolution is pure geometry; legality is checked separately.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::board::{Board, Square};
use crate::constants::{PieceKind, Player};
use crate::errors::{ChessError, Result};

const CHINESE_DIGITS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

// Both sides' name variants map to the same kind; 车 and 車 are synonyms.
static PIECE_NAMES: Lazy<HashMap<char, PieceKind>> = Lazy::new(|| {
    HashMap::from([
        ('车', PieceKind::Rook),
        ('車', PieceKind::Rook),
        ('马', PieceKind::Horse),
        ('馬', PieceKind::Horse),
        ('相', PieceKind::Elephant),
        ('象', PieceKind::Elephant),
        ('仕', PieceKind::Advisor),
        ('士', PieceKind::Advisor),
        ('帅', PieceKind::King),
        ('帥', PieceKind::King),
        ('将', PieceKind::King),
        ('將', PieceKind::King),
        ('炮', PieceKind::Cannon),
        ('砲', PieceKind::Cannon),
        ('兵', PieceKind::Pawn),
        ('卒', PieceKind::Pawn),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Advance,
    Retreat,
    Traverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ordinal {
    Front,
    Middle,
    Back,
}

fn op_from_char(ch: char) -> Option<Op> {
    match ch {
        '进' | '進' => Some(Op::Advance),
        '退' => Some(Op::Retreat),
        '平' => Some(Op::Traverse),
        _ => None,
    }
}

fn ordinal_from_char(ch: char) -> Option<Ordinal> {
    match ch {
        '前' => Some(Ordinal::Front),
        '中' => Some(Ordinal::Middle),
        '后' | '後' => Some(Ordinal::Back),
        _ => None,
    }
}

/// Parse a 1-9 numeral in the given side's numeral set.
fn numeral(ch: char, side: Player) -> Option<u8> {
    match side {
        Player::Red => CHINESE_DIGITS
            .iter()
            .position(|&c| c == ch)
            .map(|i| i as u8 + 1),
        Player::Black => match ch.to_digit(10) {
            Some(d @ 1..=9) => Some(d as u8),
            _ => None,
        },
    }
}

/// Map a side-relative file numeral (1-9) to a board file (0-8). Each side
/// counts from its own right, so the two numberings run in opposite
/// directions.
fn board_file(digit: u8, side: Player) -> u8 {
    match side {
        Player::Red => 9 - digit,
        Player::Black => digit - 1,
    }
}

/// Infer the moving side from the numeral set a token uses: Arabic digits
/// mean Black, Chinese numerals mean Red.
pub fn detect_side(token: &str) -> Result<Player> {
    if token.chars().any(|c| c.is_ascii_digit()) {
        Ok(Player::Black)
    } else if token.chars().any(|c| CHINESE_DIGITS.contains(&c)) {
        Ok(Player::Red)
    } else {
        Err(ChessError::UnknownToken(token.to_string()))
    }
}

/// Resolve a notation token against a position into a concrete
/// (from, to) pair. Performs no legality check.
pub fn resolve(board: &Board, side: Player, token: &str) -> Result<(Square, Square)> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() != 4 {
        return Err(ChessError::UnknownToken(token.to_string()));
    }

    let (kind, from) = if let Some(ordinal) = ordinal_from_char(chars[0]) {
        let kind = piece_kind(chars[1], token)?;
        (kind, select_by_ordinal(board, side, kind, ordinal, token)?)
    } else {
        let kind = piece_kind(chars[0], token)?;
        let digit = numeral(chars[1], side)
            .ok_or_else(|| ChessError::UnknownToken(token.to_string()))?;
        (kind, select_on_file(board, side, kind, board_file(digit, side), token)?)
    };

    let op = op_from_char(chars[2]).ok_or_else(|| ChessError::UnknownToken(token.to_string()))?;
    let arg =
        numeral(chars[3], side).ok_or_else(|| ChessError::UnknownToken(token.to_string()))?;

    let to = destination(from, kind, side, op, arg, token)?;
    Ok((from, to))
}

fn piece_kind(ch: char, token: &str) -> Result<PieceKind> {
    PIECE_NAMES
        .get(&ch)
        .copied()
        .ok_or_else(|| ChessError::UnknownToken(token.to_string()))
}

/// Pick the single piece of `kind` on the given board file.
fn select_on_file(
    board: &Board,
    side: Player,
    kind: PieceKind,
    file: u8,
    token: &str,
) -> Result<Square> {
    let matches: Vec<Square> = board
        .pieces_of(kind, side)
        .into_iter()
        .filter(|sq| sq.file() == file)
        .collect();
    match matches.len() {
        0 => Err(ChessError::AmbiguousNotation(format!(
            "no candidate piece for {token}"
        ))),
        1 => Ok(matches[0]),
        _ => Err(ChessError::AmbiguousNotation(format!(
            "{token} matches several pieces on one file; add a front/back qualifier"
        ))),
    }
}

/// Pick a piece by its front/middle/back ordinal among same-kind pieces
/// stacked on one file, ordered from the mover's forward direction.
fn select_by_ordinal(
    board: &Board,
    side: Player,
    kind: PieceKind,
    ordinal: Ordinal,
    token: &str,
) -> Result<Square> {
    let mut by_file: BTreeMap<u8, Vec<Square>> = BTreeMap::new();
    for sq in board.pieces_of(kind, side) {
        by_file.entry(sq.file()).or_default().push(sq);
    }

    // Only files holding at least two candidates can carry a qualifier.
    let mut stacked: Vec<Vec<Square>> =
        by_file.into_values().filter(|v| v.len() >= 2).collect();
    let mut column = match stacked.len() {
        0 => {
            return Err(ChessError::AmbiguousNotation(format!(
                "{token} needs two pieces sharing a file"
            )))
        }
        1 => stacked.remove(0),
        _ => {
            return Err(ChessError::UnsupportedNotation(format!(
                "{token}: two files each hold several candidates"
            )))
        }
    };
    if column.len() > 3 {
        return Err(ChessError::UnsupportedNotation(format!(
            "{token}: more than three candidates share a file"
        )));
    }

    // Front first, from the mover's point of view.
    match side {
        Player::Red => column.sort_by_key(|sq| std::cmp::Reverse(sq.rank())),
        Player::Black => column.sort_by_key(|sq| sq.rank()),
    }

    match ordinal {
        Ordinal::Front => Ok(column[0]),
        Ordinal::Back => Ok(column[column.len() - 1]),
        Ordinal::Middle => {
            if column.len() == 3 {
                Ok(column[1])
            } else {
                Err(ChessError::AmbiguousNotation(format!(
                    "{token} needs three pieces sharing a file"
                )))
            }
        }
    }
}

/// Compute the destination square from the origin, operator and trailing
/// numeral. For Rook/Cannon/King/Pawn the numeral is a distance on
/// advance/retreat and a destination file on traverse; the diagonal and
/// L-shaped movers always read it as a destination file, their rank delta
/// being implied by the kind.
fn destination(
    from: Square,
    kind: PieceKind,
    side: Player,
    op: Op,
    arg: u8,
    token: &str,
) -> Result<Square> {
    let forward = side.forward();
    match kind {
        PieceKind::Rook | PieceKind::Cannon | PieceKind::King | PieceKind::Pawn => match op {
            Op::Traverse => square_at(board_file(arg, side) as i8, from.rank() as i8),
            Op::Advance => square_at(
                from.file() as i8,
                from.rank() as i8 + forward * arg as i8,
            ),
            Op::Retreat => square_at(
                from.file() as i8,
                from.rank() as i8 - forward * arg as i8,
            ),
        },
        PieceKind::Advisor | PieceKind::Elephant => {
            let step = if kind == PieceKind::Advisor { 1 } else { 2 };
            let to_file = board_file(arg, side) as i8;
            if (to_file - from.file() as i8).abs() != step {
                return Err(ChessError::IllegalGeometry(
                    "destination file does not match a diagonal step",
                ));
            }
            let rank_delta = match op {
                Op::Advance => step * forward,
                Op::Retreat => -step * forward,
                Op::Traverse => {
                    return Err(ChessError::UnknownToken(token.to_string()));
                }
            };
            square_at(to_file, from.rank() as i8 + rank_delta)
        }
        PieceKind::Horse => {
            let to_file = board_file(arg, side) as i8;
            let rank_step = match (to_file - from.file() as i8).abs() {
                1 => 2,
                2 => 1,
                _ => {
                    return Err(ChessError::IllegalGeometry(
                        "horse destination file must differ by one or two",
                    ))
                }
            };
            let rank_delta = match op {
                Op::Advance => rank_step * forward,
                Op::Retreat => -rank_step * forward,
                Op::Traverse => {
                    return Err(ChessError::UnknownToken(token.to_string()));
                }
            };
            square_at(to_file, from.rank() as i8 + rank_delta)
        }
    }
}

fn square_at(file: i8, rank: i8) -> Result<Square> {
    if !(0..9).contains(&file) || !(0..10).contains(&rank) {
        return Err(ChessError::OutOfBounds {
            file: file as i32,
            rank: rank as i32,
        });
    }
    Ok(Square::at(file as u8, rank as u8))
}

// --- Transcript splitting ---

static MOVE_NUMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(\.{1,3}|[、:：])?").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,，、;；]+").unwrap());

/// Split a transcript into move tokens: strip move numbers, break on
/// whitespace and punctuation, and enforce red/black alternation.
pub fn split_moves(text: &str) -> Result<Vec<String>> {
    let cleaned = MOVE_NUMBERS.replace_all(text, " ");
    let mut tokens = Vec::new();
    let mut expected: Option<Player> = None;
    for part in SEPARATORS.split(&cleaned) {
        if part.is_empty() {
            continue;
        }
        let side = detect_side(part)?;
        if let Some(want) = expected {
            if side != want {
                return Err(ChessError::OutOfTurn {
                    expected: want,
                    got: side,
                });
            }
        }
        expected = Some(side.opponent());
        tokens.push(part.to_string());
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Piece;

    /// The mixed mid-game position the parser tests run against.
    fn test_board() -> Board {
        let mut board = Board::empty();
        for &(file, rank, piece) in &[
            (0, 0, Piece::RRook),
            (1, 0, Piece::RHorse),
            (4, 2, Piece::RElephant),
            (3, 0, Piece::RAdvisor),
            (4, 0, Piece::RKing),
            (1, 2, Piece::RCannon),
            (1, 3, Piece::RCannon),
            (0, 3, Piece::RPawn),
            (0, 5, Piece::RPawn),
            (0, 6, Piece::RPawn),
            (4, 5, Piece::RHorse),
            (8, 4, Piece::RRook),
            (1, 7, Piece::BCannon),
            (1, 9, Piece::BHorse),
            (1, 8, Piece::BHorse),
        ] {
            board.place(Square::at(file, rank), piece);
        }
        board
    }

    fn resolve_red(board: &Board, token: &str) -> (Square, Square) {
        resolve(board, Player::Red, token).unwrap()
    }

    #[test]
    fn detects_side_from_numerals() {
        assert_eq!(detect_side("马二进三").unwrap(), Player::Red);
        assert_eq!(detect_side("马2进3").unwrap(), Player::Black);
        assert!(matches!(
            detect_side("未知命令"),
            Err(ChessError::UnknownToken(_))
        ));
    }

    #[test]
    fn file_numbering_is_mirrored_per_side() {
        assert_eq!(board_file(1, Player::Red), 8);
        assert_eq!(board_file(5, Player::Red), 4);
        assert_eq!(board_file(9, Player::Red), 0);
        assert_eq!(board_file(1, Player::Black), 0);
        assert_eq!(board_file(9, Player::Black), 8);
    }

    #[test]
    fn numerals_are_side_specific() {
        assert_eq!(numeral('三', Player::Red), Some(3));
        assert_eq!(numeral('3', Player::Red), None);
        assert_eq!(numeral('3', Player::Black), Some(3));
        assert_eq!(numeral('三', Player::Black), None);
        assert_eq!(numeral('十', Player::Red), None);
        assert_eq!(numeral('0', Player::Black), None);
    }

    #[test]
    fn straight_movers() {
        let board = test_board();
        assert_eq!(
            resolve_red(&board, "车九平八"),
            (Square::at(0, 0), Square::at(1, 0))
        );
        assert_eq!(
            resolve_red(&board, "车一退一"),
            (Square::at(8, 4), Square::at(8, 3))
        );
        assert_eq!(
            resolve_red(&board, "帅五进一"),
            (Square::at(4, 0), Square::at(4, 1))
        );
    }

    #[test]
    fn horses_infer_the_rank_delta() {
        let board = test_board();
        assert_eq!(
            resolve_red(&board, "马八进七"),
            (Square::at(1, 0), Square::at(2, 2))
        );
        assert_eq!(
            resolve_red(&board, "马五退三"),
            (Square::at(4, 5), Square::at(6, 4))
        );
    }

    #[test]
    fn diagonal_movers() {
        let board = test_board();
        assert_eq!(
            resolve_red(&board, "相五进三"),
            (Square::at(4, 2), Square::at(6, 4))
        );
        assert_eq!(
            resolve_red(&board, "相五退三"),
            (Square::at(4, 2), Square::at(6, 0))
        );
        assert_eq!(
            resolve_red(&board, "士六进五"),
            (Square::at(3, 0), Square::at(4, 1))
        );
    }

    #[test]
    fn ordinal_qualifiers() {
        let board = test_board();
        assert_eq!(
            resolve_red(&board, "前炮平三"),
            (Square::at(1, 3), Square::at(6, 3))
        );
        assert_eq!(
            resolve(&board, Player::Black, "前马进3").unwrap(),
            (Square::at(1, 8), Square::at(2, 6))
        );
        assert_eq!(
            resolve_red(&board, "前兵进一"),
            (Square::at(0, 6), Square::at(0, 7))
        );
        assert_eq!(
            resolve_red(&board, "中兵平八"),
            (Square::at(0, 5), Square::at(1, 5))
        );
        assert_eq!(
            resolve_red(&board, "后兵进一"),
            (Square::at(0, 3), Square::at(0, 4))
        );
    }

    #[test]
    fn ordinal_qualifiers_that_do_not_apply() {
        let board = test_board();
        // Two cannons only; 中 needs three.
        assert!(matches!(
            resolve(&board, Player::Red, "中炮平一"),
            Err(ChessError::AmbiguousNotation(_))
        ));
        // Horses, elephants and rooks are not stacked on any file.
        for token in ["前马进一", "后相进一", "后车进一"] {
            assert!(matches!(
                resolve(&board, Player::Red, token),
                Err(ChessError::AmbiguousNotation(_))
            ));
        }
        // Black reading of 前炮: the lone black cannon cannot take a
        // qualifier.
        assert!(matches!(
            resolve(&board, Player::Black, "前炮进1"),
            Err(ChessError::AmbiguousNotation(_))
        ));
    }

    #[test]
    fn unqualified_token_with_two_on_a_file_is_ambiguous() {
        let mut board = Board::empty();
        board.place(Square::at(4, 1), Piece::RRook);
        board.place(Square::at(4, 5), Piece::RRook);
        assert!(matches!(
            resolve(&board, Player::Red, "车五进一"),
            Err(ChessError::AmbiguousNotation(_))
        ));
        // With the qualifier the same position resolves.
        assert_eq!(
            resolve(&board, Player::Red, "前车进一").unwrap(),
            (Square::at(4, 5), Square::at(4, 6))
        );
    }

    #[test]
    fn four_stacked_pawns_are_unsupported() {
        let mut board = Board::empty();
        for rank in [3, 4, 5, 6] {
            board.place(Square::at(2, rank), Piece::RPawn);
        }
        for token in ["前兵进一", "中兵进一", "后兵平六"] {
            assert!(matches!(
                resolve(&board, Player::Red, token),
                Err(ChessError::UnsupportedNotation(_))
            ));
        }
    }

    #[test]
    fn pawns_stacked_on_two_files_are_unsupported() {
        let mut board = Board::empty();
        board.place(Square::at(2, 3), Piece::RPawn);
        board.place(Square::at(2, 4), Piece::RPawn);
        board.place(Square::at(6, 3), Piece::RPawn);
        board.place(Square::at(6, 4), Piece::RPawn);
        assert!(matches!(
            resolve(&board, Player::Red, "前兵进一"),
            Err(ChessError::UnsupportedNotation(_))
        ));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let board = test_board();
        for token in ["车九前一", "车十平二", "未知命令", "相五平三", "马八平六", "车九平"] {
            assert!(matches!(
                resolve(&board, Player::Red, token),
                Err(ChessError::UnknownToken(_))
            ));
        }
    }

    #[test]
    fn rejects_impossible_geometry() {
        let board = test_board();
        // Horse cannot reach a file three away.
        assert!(matches!(
            resolve(&board, Player::Red, "马八进五"),
            Err(ChessError::IllegalGeometry(_))
        ));
        // Retreating off the board.
        assert!(matches!(
            resolve(&board, Player::Red, "车九退一"),
            Err(ChessError::OutOfBounds { .. })
        ));
        let mut tall = test_board();
        tall.place(Square::at(7, 5), Piece::RRook);
        assert!(matches!(
            resolve(&tall, Player::Red, "车二进五"),
            Err(ChessError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn zero_candidates_is_an_ambiguity_error() {
        let board = test_board();
        // There is no black king on the board.
        assert!(matches!(
            resolve(&board, Player::Black, "将5进1"),
            Err(ChessError::AmbiguousNotation(_))
        ));
        assert!(matches!(
            resolve(&board, Player::Black, "马7进6"),
            Err(ChessError::AmbiguousNotation(_))
        ));
    }

    #[test]
    fn splits_and_numbers() {
        assert_eq!(
            split_moves("炮二平五，马2进3").unwrap(),
            vec!["炮二平五", "马2进3"]
        );
        assert_eq!(split_moves("1.").unwrap(), Vec::<String>::new());
        assert_eq!(
            split_moves("1. 车一平二  马2进3  2. 车二平三").unwrap(),
            vec!["车一平二", "马2进3", "车二平三"]
        );
    }

    #[test]
    fn split_enforces_alternation() {
        assert!(matches!(
            split_moves("车一平二  车二平三"),
            Err(ChessError::OutOfTurn { .. })
        ));
    }
}
