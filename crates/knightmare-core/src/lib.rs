//! Core chess types for knightmare: bitboards, positions, attack probes,
//! legal move generation and check analysis.

mod bitboard;
mod board;
mod chess_move;
mod error;
mod fen;
mod piece;
mod position;
mod rays;
mod side;
mod square;

pub mod movegen;
pub mod perft;
pub mod probe;

pub use bitboard::Bitboard;
pub use board::{Board, PrettyBoard};
pub use chess_move::Move;
pub use error::{FenError, IllegalMoveReason, PositionError, SquareError};
pub use fen::STARTING_FEN;
pub use movegen::MoveList;
pub use movegen::check::AttackScan;
pub use piece::{Piece, PieceKind};
pub use position::{DEFAULT_PLY_LIMIT, DrawKind, GameStatus, MoveOutcome, Position, UndoRecord};
pub use rays::{aligned, between};
pub use side::Side;
pub use square::Square;
