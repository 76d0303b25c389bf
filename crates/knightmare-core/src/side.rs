//! The two sides of a game.

use std::fmt;
use std::ops::Not;

use crate::bitboard::Bitboard;

/// White or Black. Used as an index into side-keyed arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub const COUNT: usize = 2;

    pub const ALL: [Side; 2] = [Side::White, Side::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Rank delta of a pawn step: +1 for White, -1 for Black.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Rank pawns start on (and may double-push from).
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// Rank on which a pawn of this side promotes.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    /// Rank of the en-passant target squares this side may capture onto.
    #[inline]
    pub const fn en_passant_rank(self) -> u8 {
        match self {
            Side::White => 5,
            Side::Black => 2,
        }
    }

    /// This side's back rank as a mask.
    #[inline]
    pub const fn back_rank(self) -> Bitboard {
        match self {
            Side::White => Bitboard::RANK_1,
            Side::Black => Bitboard::RANK_8,
        }
    }

    /// Lowercase name, for messages.
    pub const fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

impl Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        self.opponent()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
