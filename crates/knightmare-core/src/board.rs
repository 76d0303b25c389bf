//! Piece placement: per-kind masks, per-side masks, combined occupancy and
//! the en-passant target.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::error::PositionError;
use crate::piece::{Piece, PieceKind};
use crate::side::Side;
use crate::square::Square;

/// Bitboard snapshot of the pieces on the board.
///
/// Cheap to copy, so attack probes and legality checks work on scratch
/// copies instead of mutating the game position.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Indexed by [`PieceKind::index()`].
    pieces: [Bitboard; PieceKind::COUNT],
    /// Indexed by [`Side::index()`].
    sides: [Bitboard; Side::COUNT],
    occupied: Bitboard,
    /// Square skipped by the last double pawn push, for one ply only.
    en_passant: Bitboard,
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Board {
        Board {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            sides: [Bitboard::EMPTY; Side::COUNT],
            occupied: Bitboard::EMPTY,
            en_passant: Bitboard::EMPTY,
        }
    }

    /// The standard initial setup.
    pub fn starting_position() -> Board {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for side in Side::ALL {
            let home = side.back_rank().lsb().map_or(0, Square::rank);
            for (file, kind) in BACK_RANK.into_iter().enumerate() {
                if let Some(sq) = Square::from_coords(file as u8, home) {
                    board.set_piece(Piece::new(kind, side), sq);
                }
                if let Some(sq) = Square::from_coords(file as u8, side.pawn_rank()) {
                    board.set_piece(Piece::new(PieceKind::Pawn, side), sq);
                }
            }
        }
        board
    }

    /// Put `piece` on `sq`, replacing whatever stood there.
    pub fn set_piece(&mut self, piece: Piece, sq: Square) {
        self.clear_square(sq);
        let mask = sq.bitboard();
        self.pieces[piece.kind.index()] |= mask;
        self.sides[piece.side.index()] |= mask;
        self.occupied |= mask;
    }

    /// Remove any piece from `sq`. Zeroes the bit in every mask.
    pub fn clear_square(&mut self, sq: Square) {
        let keep = !sq.bitboard();
        for mask in &mut self.pieces {
            *mask &= keep;
        }
        for mask in &mut self.sides {
            *mask &= keep;
        }
        self.occupied &= keep;
    }

    /// The piece on `sq`, if any.
    ///
    /// Consults the combined mask first, then the side masks, then the kind
    /// masks in [`PieceKind::PRIORITY`] order, so at most one piece is
    /// reported even if the masks were ever to disagree.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !self.occupied.contains(sq) {
            return None;
        }
        let side = Side::ALL
            .into_iter()
            .find(|side| self.sides[side.index()].contains(sq))?;
        let kind = PieceKind::PRIORITY
            .into_iter()
            .find(|kind| self.pieces[kind.index()].contains(sq))?;
        Some(Piece::new(kind, side))
    }

    /// Both sides' pieces of one kind.
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// One side's pieces of one kind.
    #[inline]
    pub fn pieces_of(&self, kind: PieceKind, side: Side) -> Bitboard {
        self.pieces[kind.index()] & self.sides[side.index()]
    }

    #[inline]
    pub fn side(&self, side: Side) -> Bitboard {
        self.sides[side.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn en_passant(&self) -> Bitboard {
        self.en_passant
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, target: Bitboard) {
        self.en_passant = target;
    }

    /// Square of `side`'s king. `None` only on a broken board.
    #[inline]
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces_of(PieceKind::King, side).lsb()
    }

    /// Check that each side has exactly one king.
    pub fn validate_kings(&self) -> Result<(), PositionError> {
        for side in Side::ALL {
            let kings = self.pieces_of(PieceKind::King, side).count();
            if kings != 1 {
                return Err(PositionError::InvariantViolation { side, kings });
            }
        }
        Ok(())
    }

    /// `true` when the masks agree with each other: kinds and sides are
    /// disjoint and the combined mask is the union of both sides.
    pub fn masks_consistent(&self) -> bool {
        let mut union = Bitboard::EMPTY;
        for kind in self.pieces {
            if (union & kind).is_nonempty() {
                return false;
            }
            union |= kind;
        }
        let white = self.sides[Side::White.index()];
        let black = self.sides[Side::Black.index()];
        (white & black).is_empty() && white | black == self.occupied && union == self.occupied
    }

    /// Text grid of the board, White at the bottom.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board\n{}", self.pretty())
    }
}

/// Display wrapper printing an 8x8 grid with rank and file labels.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| board.piece_at(sq))
                    .map_or('.', Piece::fen_char);
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::error::PositionError;
    use crate::piece::{Piece, PieceKind};
    use crate::side::Side;
    use crate::square::Square;

    #[test]
    fn starting_position_layout() {
        let board = Board::starting_position();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.piece_at(Square::E1), Some(Piece::new(PieceKind::King, Side::White)));
        assert_eq!(board.piece_at(Square::D8), Some(Piece::new(PieceKind::Queen, Side::Black)));
        assert_eq!(board.piece_at(Square::B1), Some(Piece::new(PieceKind::Knight, Side::White)));
        assert_eq!(board.piece_at(Square::H7), Some(Piece::new(PieceKind::Pawn, Side::Black)));
        assert_eq!(board.piece_at(Square::E4), None);
        assert!(board.masks_consistent());
        assert_eq!(board.validate_kings(), Ok(()));
    }

    #[test]
    fn set_piece_replaces_occupant() {
        let mut board = Board::starting_position();
        board.set_piece(Piece::new(PieceKind::Queen, Side::White), Square::E7);
        assert_eq!(board.piece_at(Square::E7), Some(Piece::new(PieceKind::Queen, Side::White)));
        assert!(!board.pieces(PieceKind::Pawn).contains(Square::E7));
        assert!(!board.side(Side::Black).contains(Square::E7));
        assert!(board.masks_consistent());
    }

    #[test]
    fn clear_square_zeroes_every_mask() {
        let mut board = Board::starting_position();
        board.clear_square(Square::D1);
        assert_eq!(board.piece_at(Square::D1), None);
        assert!(board.pieces(PieceKind::Queen).count() == 1);
        assert_eq!(board.occupied().count(), 31);
        assert!(board.masks_consistent());

        board.clear_square(Square::D4);
        assert_eq!(board.occupied().count(), 31);
    }

    #[test]
    fn missing_king_is_reported() {
        let mut board = Board::starting_position();
        board.clear_square(Square::E8);
        assert_eq!(
            board.validate_kings(),
            Err(PositionError::InvariantViolation { side: Side::Black, kings: 0 })
        );
        assert_eq!(board.king_square(Side::Black), None);
        assert_eq!(board.king_square(Side::White), Some(Square::E1));
    }

    #[test]
    fn pretty_print() {
        let output = Board::starting_position().pretty().to_string();
        assert!(output.starts_with("8  r n b q k b n r"));
        assert!(output.contains("1  R N B Q K B N R"));
        assert!(output.ends_with("   a b c d e f g h"));
    }
}
