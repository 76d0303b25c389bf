//! Check, pin and checkmate analysis.
//!
//! Attacks on a square are found by standing an imaginary defender piece of
//! every kind on that square and intersecting its reach with the real enemy
//! pieces of the same kind. A knight on `sq` reaches exactly the squares
//! from which an enemy knight reaches `sq`, and likewise for every other
//! kind, pawns included because the probe captures diagonally forward.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::piece::{Piece, PieceKind};
use crate::probe;
use crate::rays::between;
use crate::side::Side;
use crate::square::Square;

/// Result of scanning a square for attackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackScan {
    /// Enemy pieces attacking the square.
    pub attackers: Bitboard,
    /// Union of every simulated pattern that found at least one attacker.
    pub swept: Bitboard,
}

impl AttackScan {
    #[inline]
    pub fn is_attacked(&self) -> bool {
        self.attackers.is_nonempty()
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        self.attackers.has_several()
    }
}

/// Scan `sq` for pieces of side `by`.
///
/// The enemy king is simulated with its raw step pattern, so this never
/// recurses into king legality.
pub fn scan_attacks(board: &Board, sq: Square, by: Side) -> AttackScan {
    let defender = by.opponent();
    let mut scan = AttackScan::default();
    for kind in PieceKind::ALL {
        let reach = probe::pattern(kind, board, defender, sq);
        let found = reach & board.pieces_of(kind, by);
        if found.is_nonempty() {
            scan.attackers |= found;
            scan.swept |= reach;
        }
    }
    scan
}

#[inline]
pub fn is_attacked(board: &Board, sq: Square, by: Side) -> bool {
    scan_attacks(board, sq, by).is_attacked()
}

/// Attackers of `side`'s king. Empty when the side has no king.
pub fn checkers(board: &Board, side: Side) -> AttackScan {
    match board.king_square(side) {
        Some(king) => scan_attacks(board, king, side.opponent()),
        None => AttackScan::default(),
    }
}

#[inline]
pub fn in_check(board: &Board, side: Side) -> bool {
    checkers(board, side).is_attacked()
}

/// Step destinations of the king on `king_sq` that are not attacked once
/// the king has left its square.
pub fn king_legal_moves(board: &Board, king_sq: Square) -> Bitboard {
    let Some(king) = board.piece_at(king_sq) else {
        return Bitboard::EMPTY;
    };
    let mut vacated = *board;
    vacated.clear_square(king_sq);
    probe::king_steps(board, king.side, king_sq)
        .filter(|&dest| !is_attacked(&vacated, dest, king.side.opponent()))
        .collect()
}

/// Squares a non-king piece may move to while its king stands in a single
/// check: the checker itself or a square between it and the king.
/// Empty under double check.
pub fn evasion_mask(king_sq: Square, scan: &AttackScan) -> Bitboard {
    match scan.attackers.single() {
        Some(checker) => scan.swept & (scan.attackers | between(king_sq, checker)),
        None if scan.is_attacked() => Bitboard::EMPTY,
        None => Bitboard::FULL,
    }
}

/// The pin line of the piece on `sq`, if it is pinned to its king.
///
/// The piece is lifted off the board and the king rescanned; a sliding
/// attacker that was not there before is the pinner. The returned mask
/// holds the squares between king and pinner plus the pinner.
pub fn pin_line(board: &Board, sq: Square, king_sq: Square) -> Option<Bitboard> {
    let piece = board.piece_at(sq)?;
    let enemy = piece.side.opponent();
    let before = scan_attacks(board, king_sq, enemy).attackers;
    let mut lifted = *board;
    lifted.clear_square(sq);
    let after = scan_attacks(&lifted, king_sq, enemy).attackers;

    let sliders = board.pieces(PieceKind::Bishop)
        | board.pieces(PieceKind::Rook)
        | board.pieces(PieceKind::Queen);
    let pinner = (after & !before & sliders).lsb()?;
    Some(between(king_sq, pinner).with(pinner))
}

/// `true` if moving the piece on `from` to `to` leaves its own king safe.
///
/// Plays the move on a scratch board, including removal of a pawn taken en
/// passant, and scans the king afterwards.
pub fn leaves_king_safe(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    let mut scratch = *board;
    let enemy_pawn = Piece::new(PieceKind::Pawn, piece.side.opponent());
    if piece.kind == PieceKind::Pawn
        && from.file() != to.file()
        && board.en_passant().contains(to)
        && let Some(passed) = Square::from_coords(to.file(), from.rank())
        && board.piece_at(passed) == Some(enemy_pawn)
    {
        scratch.clear_square(passed);
    }
    scratch.clear_square(from);
    scratch.set_piece(piece, to);
    scratch.set_en_passant(Bitboard::EMPTY);
    !in_check(&scratch, piece.side)
}

/// Reduce the raw pattern of the piece on `sq` to its legal destinations.
pub fn filter_legal_moves(board: &Board, sq: Square, pseudo: Bitboard) -> Bitboard {
    let Some(piece) = board.piece_at(sq) else {
        return Bitboard::EMPTY;
    };
    // Kings are never captured.
    let pseudo = pseudo & !board.pieces_of(PieceKind::King, piece.side.opponent());
    if piece.kind == PieceKind::King {
        return pseudo & king_legal_moves(board, sq);
    }
    let Some(king_sq) = board.king_square(piece.side) else {
        return pseudo;
    };

    let scan = scan_attacks(board, king_sq, piece.side.opponent());
    let en_passant = if piece.kind == PieceKind::Pawn {
        pseudo & board.en_passant()
    } else {
        Bitboard::EMPTY
    };

    let mut legal = (pseudo & !en_passant) & evasion_mask(king_sq, &scan);
    if let Some(line) = pin_line(board, sq, king_sq) {
        legal &= line;
    }
    for dest in en_passant {
        if leaves_king_safe(board, sq, dest) {
            legal = legal.with(dest);
        }
    }
    legal
}

/// `true` when `side`'s king is attacked and no legal move gets it out.
pub fn is_checkmate(board: &Board, side: Side) -> bool {
    let Some(king_sq) = board.king_square(side) else {
        return false;
    };
    let scan = scan_attacks(board, king_sq, side.opponent());
    if !scan.is_attacked() {
        return false;
    }
    if king_legal_moves(board, king_sq).is_nonempty() {
        return false;
    }
    if scan.is_double() {
        return true;
    }
    let can_resolve = |kind: PieceKind| {
        board.pieces_of(kind, side).into_iter().any(|sq| {
            let pseudo = probe::pattern(kind, board, side, sq);
            filter_legal_moves(board, sq, pseudo).is_nonempty()
        })
    };
    !PieceKind::ALL
        .into_iter()
        .filter(|&kind| kind != PieceKind::King)
        .any(can_resolve)
}
