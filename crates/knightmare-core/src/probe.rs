//! Raw movement patterns per piece kind.
//!
//! Every probe answers "where could a piece of side `mine` standing on `sq`
//! go on this board", ignoring whether its own king would be left in check.
//! The square does not need to hold such a piece: the check analyzer places
//! imaginary pieces on a target square and intersects their reach with the
//! real enemy pieces.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::piece::PieceKind;
use crate::side::Side;
use crate::square::Square;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Pattern of the given kind. Dispatches to the per-kind probes.
pub fn pattern(kind: PieceKind, board: &Board, mine: Side, sq: Square) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn(board, mine, sq),
        PieceKind::Knight => knight(board, mine, sq),
        PieceKind::Bishop => bishop(board, mine, sq),
        PieceKind::Rook => rook(board, mine, sq),
        PieceKind::Queen => queen(board, mine, sq),
        PieceKind::King => king_steps(board, mine, sq),
    }
}

/// Diagonal squares a pawn of `side` on `sq` strikes, regardless of occupancy.
pub fn pawn_strikes(side: Side, sq: Square) -> Bitboard {
    [-1, 1]
        .into_iter()
        .filter_map(|df| sq.offset(df, side.forward()))
        .collect()
}

/// Single push onto an empty square, double push from the start rank when
/// both squares are empty, and diagonal captures onto an enemy piece or the
/// en-passant target.
pub fn pawn(board: &Board, mine: Side, sq: Square) -> Bitboard {
    let occupied = board.occupied();
    let mut reach = Bitboard::EMPTY;

    if let Some(one) = sq.offset(0, mine.forward()) {
        if !occupied.contains(one) {
            reach = reach.with(one);
            if sq.rank() == mine.pawn_rank() {
                if let Some(two) = one.offset(0, mine.forward()) {
                    if !occupied.contains(two) {
                        reach = reach.with(two);
                    }
                }
            }
        }
    }

    let en_passant = board.en_passant() & Bitboard::rank(mine.en_passant_rank());
    let targets = board.side(mine.opponent()) | en_passant;
    reach | (pawn_strikes(mine, sq) & targets)
}

pub fn knight(board: &Board, mine: Side, sq: Square) -> Bitboard {
    steps(&KNIGHT_STEPS, sq) & !board.side(mine)
}

pub fn bishop(board: &Board, mine: Side, sq: Square) -> Bitboard {
    slide(board, mine, sq, &DIAGONALS)
}

pub fn rook(board: &Board, mine: Side, sq: Square) -> Bitboard {
    slide(board, mine, sq, &ORTHOGONALS)
}

pub fn queen(board: &Board, mine: Side, sq: Square) -> Bitboard {
    bishop(board, mine, sq) | rook(board, mine, sq)
}

/// The adjacent squares not holding an own piece. Attacked squares are
/// not filtered out here.
pub fn king_steps(board: &Board, mine: Side, sq: Square) -> Bitboard {
    steps(&KING_STEPS, sq) & !board.side(mine)
}

fn steps(offsets: &[(i8, i8)], sq: Square) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(df, dr)| sq.offset(df, dr))
        .collect()
}

/// Walk outwards one square at a time: empty squares extend the ray, an
/// enemy square ends it inclusively, an own square ends it exclusively.
fn slide(board: &Board, mine: Side, sq: Square, directions: &[(i8, i8)]) -> Bitboard {
    let own = board.side(mine);
    let occupied = board.occupied();
    let mut reach = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(df, dr) {
            if own.contains(next) {
                break;
            }
            reach = reach.with(next);
            if occupied.contains(next) {
                break;
            }
            cursor = next;
        }
    }
    reach
}
