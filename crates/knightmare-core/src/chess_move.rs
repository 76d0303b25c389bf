//! A move as a source and destination square.

use std::fmt;
use std::str::FromStr;

use crate::error::SquareError;
use crate::square::Square;

/// `(from, to)`. Promotion is always to a queen, so no piece is carried.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }
}

impl FromStr for Move {
    type Err = SquareError;

    /// Parse coordinate notation such as `"e2e4"`.
    fn from_str(s: &str) -> Result<Move, SquareError> {
        let trimmed = s.trim();
        if trimmed.len() != 4 || !trimmed.is_ascii() {
            return Err(SquareError::Invalid {
                notation: trimmed.to_string(),
            });
        }
        let (from, to) = trimmed.split_at(2);
        Ok(Move::new(from.parse()?, to.parse()?))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::square::Square;

    #[test]
    fn display_is_coordinate_notation() {
        assert_eq!(Move::new(Square::E2, Square::E4).to_string(), "e2e4");
        assert_eq!(format!("{:?}", Move::new(Square::G8, Square::F6)), "Move(g8f6)");
    }

    #[test]
    fn parse() {
        assert_eq!("b1c3".parse::<Move>(), Ok(Move::new(Square::B1, Square::C3)));
        assert!("b1c".parse::<Move>().is_err());
        assert!("b1c9".parse::<Move>().is_err());
        assert!("éé1".parse::<Move>().is_err());
    }
}
