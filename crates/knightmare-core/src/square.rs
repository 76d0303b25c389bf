//! Board squares in little-endian rank-file order.

use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::error::SquareError;

/// A square on the board. Index = rank * 8 + file, so a1 = 0, h1 = 7, h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    /// Square from zero-based file and rank, `None` off the board.
    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based file (0 = a).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Zero-based rank (0 = rank 1).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1u64 << self.0)
    }

    /// Step by a file and rank delta. Returns `None` instead of wrapping
    /// around a board edge.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Some(Square((rank * 8 + file) as u8))
        }
    }

    /// All 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }
}

/// Named constants `Square::A1` .. `Square::H8`, one rank per line.
macro_rules! named_squares {
    ($($rank:literal: $a:ident $b:ident $c:ident $d:ident $e:ident $f:ident $g:ident $h:ident;)*) => {
        impl Square {
            $(
                pub const $a: Square = Square($rank * 8);
                pub const $b: Square = Square($rank * 8 + 1);
                pub const $c: Square = Square($rank * 8 + 2);
                pub const $d: Square = Square($rank * 8 + 3);
                pub const $e: Square = Square($rank * 8 + 4);
                pub const $f: Square = Square($rank * 8 + 5);
                pub const $g: Square = Square($rank * 8 + 6);
                pub const $h: Square = Square($rank * 8 + 7);
            )*
        }
    };
}

named_squares! {
    0: A1 B1 C1 D1 E1 F1 G1 H1;
    1: A2 B2 C2 D2 E2 F2 G2 H2;
    2: A3 B3 C3 D3 E3 F3 G3 H3;
    3: A4 B4 C4 D4 E4 F4 G4 H4;
    4: A5 B5 C5 D5 E5 F5 G5 H5;
    5: A6 B6 C6 D6 E6 F6 G6 H6;
    6: A7 B7 C7 D7 E7 F7 G7 H7;
    7: A8 B8 C8 D8 E8 F8 G8 H8;
}

impl FromStr for Square {
    type Err = SquareError;

    /// Parse algebraic notation such as `"e4"`. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Square, SquareError> {
        let trimmed = s.trim();
        let invalid = || SquareError::Invalid {
            notation: trimmed.to_string(),
        };
        let &[file, rank] = trimmed.as_bytes() else {
            return Err(invalid());
        };
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Square::from_coords(file - b'a', rank - b'1').ok_or_else(invalid)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        write!(f, "{file}{}", self.rank() + 1)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Square;
    use crate::error::SquareError;

    #[test]
    fn coords_roundtrip() {
        for sq in Square::all() {
            assert_eq!(Square::from_coords(sq.file(), sq.rank()), Some(sq));
        }
        assert_eq!(Square::from_coords(8, 0), None);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("a1".parse::<Square>(), Ok(Square::A1));
        assert_eq!(" e4 ".parse::<Square>(), Ok(Square::E4));
        assert_eq!("h8".parse::<Square>(), Ok(Square::H8));
        assert_eq!(Square::B1.to_string(), "b1");
        assert_eq!(format!("{:?}", Square::E4), "Square(e4)");
    }

    #[test]
    fn parse_rejects_bad_notation() {
        for bad in ["", "e", "i1", "a9", "a0", "E4", "e44"] {
            assert!(
                matches!(bad.parse::<Square>(), Err(SquareError::Invalid { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn offset_never_wraps() {
        assert_eq!(Square::H4.offset(1, 0), None);
        assert_eq!(Square::A4.offset(-1, 0), None);
        assert_eq!(Square::E8.offset(0, 1), None);
        assert_eq!(Square::E1.offset(0, -1), None);
        assert_eq!(Square::G1.offset(1, 2), Some(Square::H3));
        assert_eq!(Square::G1.offset(2, 1), None);
    }
}
