//! Leaf evaluation.
//!
//! The search only needs a [`Evaluator::score`] capability; any
//! implementation can be plugged into
//! [`SearchEngine`](crate::SearchEngine). [`MaterialEvaluator`] is the one
//! the engine ships with.

use knightmare_core::{Bitboard, GameStatus, PieceKind, Position, Side};

/// Scores a position in centipawns from one side's point of view.
///
/// Must not change the position. `status` is the terminal state reached by
/// the last move, `GameStatus::Ongoing` at the search horizon.
pub trait Evaluator {
    fn score(&self, position: &Position, perspective: Side, status: GameStatus) -> i32;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn score(&self, position: &Position, perspective: Side, status: GameStatus) -> i32 {
        (**self).score(position, perspective, status)
    }
}

/// Base material values indexed by [`PieceKind::index()`].
///
/// | Piece  | cp  |
/// |--------|-----|
/// | Pawn   | 100 |
/// | Knight | 320 |
/// | Bishop | 330 |
/// | Rook   | 500 |
/// | Queen  | 900 |
/// | King   |   0 |
pub const MATERIAL_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 0];

/// Bonus per piece by rank, counted from the owner's back rank.
const RANK_BONUS: [i32; 8] = [-2, 2, 3, 8, 12, 15, 12, 3];

/// Bonus per knight or bishop that has left its home square.
const DEVELOPED_MINOR_BONUS: i32 = 10;

/// Penalty when the last move was a queen or rook move made before two
/// minor pieces were developed.
const EARLY_HEAVY_PIECE_PENALTY: i32 = 20;

/// Material balance plus small advancement and development terms.
/// Draws score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub fn new() -> MaterialEvaluator {
        MaterialEvaluator
    }

    /// Everything this evaluator knows about `side`, not relative to the
    /// opponent.
    fn side_total(&self, position: &Position, side: Side) -> i32 {
        let board = position.board();
        let own = board.side(side);

        let material: i32 = PieceKind::ALL
            .into_iter()
            .map(|kind| MATERIAL_VALUE[kind.index()] * board.pieces_of(kind, side).count() as i32)
            .sum();

        let advancement: i32 = (0u8..8)
            .map(|rank| {
                let relative = match side {
                    Side::White => rank,
                    Side::Black => 7 - rank,
                };
                RANK_BONUS[relative as usize] * (own & Bitboard::rank(rank)).count() as i32
            })
            .sum();

        material + advancement + self.development(position, side)
    }

    fn development(&self, position: &Position, side: Side) -> i32 {
        let undeveloped = (position.development() & side.back_rank()).count() as i32;
        let developed = 4 - undeveloped;
        let mut score = DEVELOPED_MINOR_BONUS * developed;

        if let Some(last) = position.history().last() {
            let heavy = matches!(last.moved.kind, PieceKind::Queen | PieceKind::Rook);
            if last.moved.side == side && heavy && developed < 2 {
                score -= EARLY_HEAVY_PIECE_PENALTY;
            }
        }
        score
    }
}

impl Evaluator for MaterialEvaluator {
    fn score(&self, position: &Position, perspective: Side, status: GameStatus) -> i32 {
        if matches!(status, GameStatus::Draw(_)) {
            return 0;
        }
        self.side_total(position, perspective) - self.side_total(position, perspective.opponent())
    }
}
