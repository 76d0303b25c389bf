//! Legal move generation.
//!
//! Each piece's raw pattern comes from [`probe`](crate::probe); the
//! [`check`] analyzer then strips destinations that would leave the
//! mover's own king attacked.

pub mod check;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::PieceKind;
use crate::probe;
use crate::side::Side;
use crate::square::Square;

use self::check::filter_legal_moves;

/// Stack-allocated buffer for generated moves. Capacity 256 covers the theoretical max of 218.
pub struct MoveList {
    moves: [Move; 256],
    len: u16,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::new(Square::A1, Square::A1); 256],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < 256);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Raw pattern of the piece on `sq`, empty for an empty square.
pub fn pseudo_legal_moves(board: &Board, sq: Square) -> Bitboard {
    match board.piece_at(sq) {
        Some(piece) => probe::pattern(piece.kind, board, piece.side, sq),
        None => Bitboard::EMPTY,
    }
}

/// Legal destinations of the piece on `sq`.
pub fn legal_moves(board: &Board, sq: Square) -> Bitboard {
    filter_legal_moves(board, sq, pseudo_legal_moves(board, sq))
}

/// Every legal move of `side`, grouped by piece kind (pawns first) and then
/// ordered by source and destination square.
pub fn generate_legal_moves(board: &Board, side: Side) -> MoveList {
    let mut list = MoveList::new();
    for kind in PieceKind::ALL {
        for from in board.pieces_of(kind, side) {
            for to in legal_moves(board, from) {
                list.push(Move::new(from, to));
            }
        }
    }
    list
}

/// `true` as soon as one legal move of `side` is found.
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    board
        .side(side)
        .into_iter()
        .any(|sq| legal_moves(board, sq).is_nonempty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    #[test]
    fn twenty_moves_from_start() {
        let board = Board::starting_position();
        assert_eq!(generate_legal_moves(&board, Side::White).len(), 20);
        assert_eq!(generate_legal_moves(&board, Side::Black).len(), 20);
    }

    #[test]
    fn knight_b1_targets() {
        let board = Board::starting_position();
        assert_eq!(
            legal_moves(&board, Square::B1),
            Square::A3.bitboard() | Square::C3.bitboard()
        );
    }

    #[test]
    fn empty_square_has_no_moves() {
        let board = Board::starting_position();
        assert!(legal_moves(&board, Square::E4).is_empty());
        assert!(pseudo_legal_moves(&board, Square::E4).is_empty());
    }

    #[test]
    fn legal_is_subset_of_pattern() {
        let mut board = Board::starting_position();
        board.clear_square(Square::E2);
        board.clear_square(Square::F7);
        board.set_piece(Piece::new(PieceKind::Queen, Side::Black), Square::H4);
        for side in Side::ALL {
            for sq in board.side(side) {
                let pseudo = pseudo_legal_moves(&board, sq);
                let legal = legal_moves(&board, sq);
                assert_eq!(legal & !pseudo, Bitboard::EMPTY, "{sq}");
            }
        }
        assert!(legal_moves(&board, Square::F2).is_empty());
    }

    #[test]
    fn list_ordering_and_lookup() {
        let board = Board::starting_position();
        let moves = generate_legal_moves(&board, Side::White);
        assert_eq!(moves[0], Move::new(Square::A2, Square::A3));
        assert!(moves.contains(Move::new(Square::G1, Square::F3)));
        assert!(!moves.contains(Move::new(Square::E1, Square::E2)));
        assert_eq!(moves.iter().count(), moves.len());
    }

    #[test]
    fn stalemated_king_has_no_move() {
        let mut board = Board::empty();
        board.set_piece(Piece::new(PieceKind::King, Side::Black), Square::A8);
        board.set_piece(Piece::new(PieceKind::Queen, Side::White), Square::B6);
        board.set_piece(Piece::new(PieceKind::King, Side::White), Square::C1);
        assert!(!has_legal_move(&board, Side::Black));
        assert!(has_legal_move(&board, Side::White));
    }
}
