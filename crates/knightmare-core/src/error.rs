//! Error types for square notation, FEN parsing and position updates.

use crate::side::Side;
use crate::square::Square;

/// Malformed square notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    /// Not a file letter `a`-`h` followed by a rank digit `1`-`8`.
    #[error("invalid square \"{notation}\"")]
    Invalid {
        /// The rejected input.
        notation: String,
    },
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMoveReason {
    /// Nothing stands on the source square.
    #[error("source square is empty")]
    EmptySource,
    /// The piece on the source square belongs to the side not on move.
    #[error("piece does not belong to the side to move")]
    WrongSide,
    /// The destination is not among the piece's legal moves.
    #[error("destination is not a legal move")]
    NotLegal,
    /// The destination holds a king.
    #[error("kings cannot be captured")]
    KingCapture,
}

/// Errors raised while mutating or inspecting a [`Position`](crate::Position).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The requested move cannot be applied.
    #[error("illegal move {from}{to}: {reason}")]
    IllegalMove {
        from: Square,
        to: Square,
        reason: IllegalMoveReason,
    },
    /// A side does not have exactly one king. Internal consistency failure.
    #[error("invariant violated: {side} has {kings} kings")]
    InvariantViolation {
        side: Side,
        kings: u32,
    },
}

/// Errors from parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// Fewer than the 2 mandatory fields (placement, side to move).
    #[error("expected at least 2 FEN fields, found {found}")]
    MissingFields { found: usize },
    /// The placement does not describe 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    /// A rank describes more or fewer than 8 squares.
    #[error("rank {rank} describes {length} squares, expected 8")]
    BadRankLength { rank: u8, length: usize },
    /// Unknown piece letter.
    #[error("invalid piece character '{character}'")]
    InvalidPieceChar { character: char },
    /// Side-to-move field is not `w` or `b`.
    #[error("invalid side to move \"{found}\"")]
    InvalidSide { found: String },
    /// En-passant field is neither `-` nor a square.
    #[error("invalid en passant square \"{found}\"")]
    InvalidEnPassant { found: String },
    /// A move counter is not a number.
    #[error("invalid {field} \"{found}\"")]
    InvalidCounter { field: &'static str, found: String },
    /// The side that just moved is in check, so its king could be taken.
    #[error("{side} is in check but it is not their move")]
    SideNotToMoveInCheck { side: Side },
    /// The placement does not give each side exactly one king.
    #[error("invalid position: {source}")]
    InvalidPosition {
        #[from]
        source: PositionError,
    },
}

#[cfg(test)]
mod tests {
    use super::{FenError, IllegalMoveReason, PositionError, SquareError};
    use crate::side::Side;
    use crate::square::Square;

    #[test]
    fn illegal_move_display() {
        let err = PositionError::IllegalMove {
            from: Square::E2,
            to: Square::E5,
            reason: IllegalMoveReason::NotLegal,
        };
        assert_eq!(err.to_string(), "illegal move e2e5: destination is not a legal move");
    }

    #[test]
    fn square_error_display() {
        let err = SquareError::Invalid { notation: "z9".into() };
        assert_eq!(err.to_string(), "invalid square \"z9\"");
    }

    #[test]
    fn fen_error_wraps_position_error() {
        let inner = PositionError::InvariantViolation { side: Side::Black, kings: 0 };
        let err: FenError = inner.clone().into();
        assert_eq!(err, FenError::InvalidPosition { source: inner });
        assert_eq!(err.to_string(), "invalid position: invariant violated: black has 0 kings");
    }

    #[test]
    fn reasons_are_errors_with_messages() {
        let reason: &dyn std::error::Error = &IllegalMoveReason::KingCapture;
        assert_eq!(reason.to_string(), "kings cannot be captured");
        assert_eq!(IllegalMoveReason::EmptySource.to_string(), "source square is empty");
        assert_eq!(
            IllegalMoveReason::WrongSide.to_string(),
            "piece does not belong to the side to move"
        );
    }

    #[test]
    fn waiting_side_in_check_display() {
        let err = FenError::SideNotToMoveInCheck { side: Side::Black };
        assert_eq!(err.to_string(), "black is in check but it is not their move");
    }
}
