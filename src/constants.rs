//! Piece and player definitions shared across the crate.

// Negative values for Black, positive for Red, so a piece's side is its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum Piece {
    BKing = -1,
    BAdvisor = -2,
    BElephant = -3,
    BHorse = -4,
    BRook = -5,
    BCannon = -6,
    BPawn = -7,
    Empty = 0,
    RKing = 1,
    RAdvisor = 2,
    RElephant = 3,
    RHorse = 4,
    RRook = 5,
    RCannon = 6,
    RPawn = 7,
}

/// The movement class of a piece, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    King = 1,
    Advisor = 2,
    Elephant = 3,
    Horse = 4,
    Rook = 5,
    Cannon = 6,
    Pawn = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Player {
    Red = 1,
    Black = -1,
}

impl Piece {
    /// Get the player associated with a piece.
    /// Returns `None` if the piece is `Empty`.
    pub fn player(self) -> Option<Player> {
        if (self as i8) > 0 {
            Some(Player::Red)
        } else if (self as i8) < 0 {
            Some(Player::Black)
        } else {
            None
        }
    }

    /// Get the movement class of a piece, ignoring its side.
    pub fn kind(self) -> Option<PieceKind> {
        match (self as i8).abs() {
            1 => Some(PieceKind::King),
            2 => Some(PieceKind::Advisor),
            3 => Some(PieceKind::Elephant),
            4 => Some(PieceKind::Horse),
            5 => Some(PieceKind::Rook),
            6 => Some(PieceKind::Cannon),
            7 => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// Split a piece into its kind and side, or `None` for `Empty`.
    pub fn parts(self) -> Option<(PieceKind, Player)> {
        Some((self.kind()?, self.player()?))
    }

    pub fn from_parts(kind: PieceKind, player: Player) -> Piece {
        Piece::from_signed(kind as i8 * player as i8)
    }

    pub fn from_signed(val: i8) -> Piece {
        match val {
            -1 => Piece::BKing, -2 => Piece::BAdvisor, -3 => Piece::BElephant, -4 => Piece::BHorse,
            -5 => Piece::BRook, -6 => Piece::BCannon, -7 => Piece::BPawn,
             1 => Piece::RKing,  2 => Piece::RAdvisor,  3 => Piece::RElephant,  4 => Piece::RHorse,
             5 => Piece::RRook,  6 => Piece::RCannon,  7 => Piece::RPawn,
            _ => Piece::Empty,
        }
    }

    pub fn to_fen_char(self) -> char {
        match self {
            Piece::BKing => 'k',
            Piece::BAdvisor => 'a',
            Piece::BElephant => 'b',
            Piece::BHorse => 'n',
            Piece::BRook => 'r',
            Piece::BCannon => 'c',
            Piece::BPawn => 'p',
            Piece::Empty => '.',
            Piece::RKing => 'K',
            Piece::RAdvisor => 'A',
            Piece::RElephant => 'B',
            Piece::RHorse => 'N',
            Piece::RRook => 'R',
            Piece::RCannon => 'C',
            Piece::RPawn => 'P',
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        match c {
            'k' => Some(Piece::BKing),
            'a' => Some(Piece::BAdvisor),
            'b' => Some(Piece::BElephant),
            'n' => Some(Piece::BHorse),
            'r' => Some(Piece::BRook),
            'c' => Some(Piece::BCannon),
            'p' => Some(Piece::BPawn),
            'K' => Some(Piece::RKing),
            'A' => Some(Piece::RAdvisor),
            'B' => Some(Piece::RElephant),
            'N' => Some(Piece::RHorse),
            'R' => Some(Piece::RRook),
            'C' => Some(Piece::RCannon),
            'P' => Some(Piece::RPawn),
            _ => None,
        }
    }
}

impl Player {
    /// Get the opponent of the current player.
    pub fn opponent(self) -> Player {
        match self {
            Player::Red => Player::Black,
            Player::Black => Player::Red,
        }
    }

    /// Rank direction this side advances in. Red sits at rank 0 and moves up.
    pub fn forward(self) -> i8 {
        self as i8
    }
}
