//! Errors surfaced to the console driver.

use knightmare_core::{FenError, PositionError, SquareError};
use knightmare_engine::SearchError;

/// Errors that can occur while driving a game from the console.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Square notation that is not a file `a`-`h` plus a rank `1`-`8`.
    #[error(transparent)]
    InvalidSquare(#[from] SquareError),

    /// The position refused a move: empty source, wrong side, not a legal
    /// destination or a king capture.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// The starting FEN could not be parsed.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),

    /// The engine failed to produce a move.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// A line that matches no command.
    #[error("unknown command \"{input}\", type help for a list")]
    UnknownCommand {
        /// The rejected line.
        input: String,
    },

    /// A command given without its required argument.
    #[error("{command} needs a square, e.g. \"{command} e2\"")]
    MissingArgument {
        /// The command keyword.
        command: &'static str,
    },

    /// An I/O error on the session's input or output.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::GameError;
    use knightmare_core::{IllegalMoveReason, PositionError, Square, SquareError};

    #[test]
    fn boundary_errors_keep_core_messages() {
        let err: GameError = SquareError::Invalid { notation: "i9".into() }.into();
        assert_eq!(err.to_string(), "invalid square \"i9\"");

        let err: GameError = PositionError::IllegalMove {
            from: Square::E7,
            to: Square::E5,
            reason: IllegalMoveReason::WrongSide,
        }
        .into();
        assert!(matches!(err, GameError::Position(_)));
        assert_eq!(
            err.to_string(),
            "illegal move e7e5: piece does not belong to the side to move"
        );
    }

    #[test]
    fn missing_argument_names_the_command() {
        let err = GameError::MissingArgument { command: "moves" };
        assert_eq!(err.to_string(), "moves needs a square, e.g. \"moves e2\"");
    }
}
