//! Game position: board, side to move, development, ply counting and the
//! undo stack.

use std::fmt;

use tracing::error;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::error::{IllegalMoveReason, PositionError};
use crate::movegen::{self, MoveList, check};
use crate::piece::{Piece, PieceKind};
use crate::side::Side;
use crate::square::Square;

/// Plies after which a game without mate is drawn.
pub const DEFAULT_PLY_LIMIT: u32 = 250;

/// Home squares of the knights and bishops of both sides.
const MINOR_HOMES: Bitboard = Bitboard::new(0x6600_0000_0000_0066);

/// Why a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// The ply counter reached its ceiling.
    PlyLimit,
    /// The side to move has no legal move and is not in check.
    Stalemate,
}

/// State of the game after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is mated.
    Checkmate,
    Draw(DrawKind),
}

impl GameStatus {
    /// Terminal flag handed to evaluators: 0 ongoing, 1 checkmate, 2 draw.
    pub const fn code(self) -> u8 {
        match self {
            GameStatus::Ongoing => 0,
            GameStatus::Checkmate => 1,
            GameStatus::Draw(_) => 2,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Checkmate => f.write_str("checkmate"),
            GameStatus::Draw(DrawKind::PlyLimit) => f.write_str("draw by ply limit"),
            GameStatus::Draw(DrawKind::Stalemate) => f.write_str("draw by stalemate"),
        }
    }
}

/// What applying a move produced, seen from the side now to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The side to move is in check.
    pub in_check: bool,
    pub status: GameStatus,
}

/// Everything needed to take one move back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    /// The piece as it stood on `from`, before any promotion.
    pub moved: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    /// Where the captured piece stood. Differs from `to` only en passant.
    pub capture_square: Square,
    pub promoted: bool,
    en_passant: Bitboard,
    development: Bitboard,
    side_to_move: Side,
}

impl UndoRecord {
    #[inline]
    pub fn as_move(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

/// A game in progress.
///
/// Owns the board plus the bookkeeping that the board snapshot does not
/// carry. The only mutators that touch history are [`apply_move`] and
/// [`undo_last`], and each undo restores the state before its move bit for
/// bit.
///
/// [`apply_move`]: Position::apply_move
/// [`undo_last`]: Position::undo_last
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Side,
    /// Home squares still holding their original minor piece.
    development: Bitboard,
    history: Vec<UndoRecord>,
    ply: u32,
    ply_limit: u32,
}

impl Position {
    /// The standard starting position, White to move.
    pub fn new() -> Position {
        Position {
            board: Board::starting_position(),
            side_to_move: Side::White,
            development: MINOR_HOMES,
            history: Vec::new(),
            ply: 0,
            ply_limit: DEFAULT_PLY_LIMIT,
        }
    }

    /// Wrap an arbitrary board. Fails unless each side has exactly one king.
    pub fn from_board(board: Board, side_to_move: Side) -> Result<Position, PositionError> {
        board.validate_kings()?;
        Ok(Position {
            development: undeveloped_minors(&board),
            board,
            side_to_move,
            history: Vec::new(),
            ply: 0,
            ply_limit: DEFAULT_PLY_LIMIT,
        })
    }

    /// Builder-style override of the ply ceiling.
    pub fn with_ply_limit(mut self, limit: u32) -> Position {
        self.ply_limit = limit;
        self
    }

    pub fn set_ply_limit(&mut self, limit: u32) {
        self.ply_limit = limit;
    }

    pub(crate) fn set_ply(&mut self, ply: u32) {
        self.ply = ply;
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline]
    pub fn development(&self) -> Bitboard {
        self.development
    }

    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn ply_limit(&self) -> u32 {
        self.ply_limit
    }

    #[inline]
    pub fn history(&self) -> &[UndoRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(UndoRecord::as_move)
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Place a piece outside of move play, e.g. while setting up a position.
    /// Leaves history untouched.
    pub fn set_piece(&mut self, piece: Piece, sq: Square) {
        self.board.set_piece(piece, sq);
        self.development = self.development & undeveloped_minors(&self.board);
    }

    /// Empty a square outside of move play.
    pub fn clear_square(&mut self, sq: Square) {
        self.board.clear_square(sq);
        self.development = self.development.without(sq);
    }

    /// Legal destinations of the piece on `sq`, whichever side it belongs to.
    pub fn legal_moves(&self, sq: Square) -> Bitboard {
        movegen::legal_moves(&self.board, sq)
    }

    /// All legal moves of the side to move.
    pub fn legal_move_list(&self) -> MoveList {
        movegen::generate_legal_moves(&self.board, self.side_to_move)
    }

    pub fn legal_moves_for(&self, side: Side) -> MoveList {
        movegen::generate_legal_moves(&self.board, side)
    }

    pub fn in_check(&self, side: Side) -> bool {
        check::in_check(&self.board, side)
    }

    pub fn is_checkmate(&self, side: Side) -> bool {
        check::is_checkmate(&self.board, side)
    }

    /// Status from the point of view of the side to move.
    pub fn status(&self) -> GameStatus {
        self.status_of(self.side_to_move)
    }

    /// Status as if `side` were to move.
    pub fn status_of(&self, side: Side) -> GameStatus {
        self.status_for(side, self.in_check(side))
    }

    fn status_for(&self, side: Side, in_check: bool) -> GameStatus {
        if in_check {
            if check::is_checkmate(&self.board, side) {
                return GameStatus::Checkmate;
            }
        } else if !movegen::has_legal_move(&self.board, side) {
            return GameStatus::Draw(DrawKind::Stalemate);
        }
        if self.ply >= self.ply_limit {
            GameStatus::Draw(DrawKind::PlyLimit)
        } else {
            GameStatus::Ongoing
        }
    }

    /// Validated move entry for callers outside the engine: the piece must
    /// belong to the side to move and `to` must be one of its legal moves.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, PositionError> {
        let illegal = |reason| PositionError::IllegalMove { from, to, reason };
        let piece = self
            .board
            .piece_at(from)
            .ok_or(illegal(IllegalMoveReason::EmptySource))?;
        if piece.side != self.side_to_move {
            return Err(illegal(IllegalMoveReason::WrongSide));
        }
        if !self.legal_moves(from).contains(to) {
            return Err(illegal(IllegalMoveReason::NotLegal));
        }
        self.apply_move(from, to)
    }

    /// Move the piece on `from` to `to`, resolving captures, en passant and
    /// promotion to a queen, and push an undo record.
    ///
    /// Legality is the caller's business; only an empty source, a king
    /// capture and a capture of an own piece are refused. The side to move
    /// becomes the opponent of the moved piece.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, PositionError> {
        let illegal = |reason| PositionError::IllegalMove { from, to, reason };
        let moved = self
            .board
            .piece_at(from)
            .ok_or(illegal(IllegalMoveReason::EmptySource))?;
        let target = self.board.piece_at(to);
        match target {
            Some(piece) if piece.kind == PieceKind::King => {
                return Err(illegal(IllegalMoveReason::KingCapture));
            }
            Some(piece) if piece.side == moved.side => {
                return Err(illegal(IllegalMoveReason::NotLegal));
            }
            _ => {}
        }

        let en_passant = self.board.en_passant();
        let passed = Square::from_coords(to.file(), from.rank());
        let enemy_pawn = Piece::new(PieceKind::Pawn, moved.side.opponent());
        let takes_en_passant = moved.kind == PieceKind::Pawn
            && target.is_none()
            && from.file() != to.file()
            && to.rank() == moved.side.en_passant_rank()
            && en_passant.contains(to)
            && passed.and_then(|sq| self.board.piece_at(sq)) == Some(enemy_pawn);
        let capture_square = match passed {
            Some(sq) if takes_en_passant => sq,
            _ => to,
        };
        let captured = self.board.piece_at(capture_square);
        let promoted = moved.kind == PieceKind::Pawn && to.rank() == moved.side.promotion_rank();

        self.history.push(UndoRecord {
            moved,
            from,
            to,
            captured,
            capture_square,
            promoted,
            en_passant,
            development: self.development,
            side_to_move: self.side_to_move,
        });

        if captured.is_some() {
            self.board.clear_square(capture_square);
        }
        self.board.clear_square(from);
        let placed = if promoted {
            Piece::new(PieceKind::Queen, moved.side)
        } else {
            moved
        };
        self.board.set_piece(placed, to);

        let double_push = moved.kind == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2;
        let skipped = if double_push {
            from.offset(0, moved.side.forward())
                .map_or(Bitboard::EMPTY, Square::bitboard)
        } else {
            Bitboard::EMPTY
        };
        self.board.set_en_passant(skipped);

        self.development = self.development.without(from).without(capture_square);
        self.side_to_move = moved.side.opponent();
        self.ply += 1;

        if let Err(err) = self.board.validate_kings() {
            error!(error = %err, mv = %Move::new(from, to), "king invariant broken, reverting move");
            self.undo_last();
            return Err(err);
        }

        let opponent = moved.side.opponent();
        let in_check = self.in_check(opponent);
        Ok(MoveOutcome {
            in_check,
            status: self.status_for(opponent, in_check),
        })
    }

    /// Take back the most recent move. Returns the popped record, or `None`
    /// with the position untouched when there is no history.
    pub fn undo_last(&mut self) -> Option<UndoRecord> {
        let record = self.history.pop()?;
        self.board.clear_square(record.to);
        self.board.set_piece(record.moved, record.from);
        if let Some(captured) = record.captured {
            self.board.set_piece(captured, record.capture_square);
        }
        self.board.set_en_passant(record.en_passant);
        self.development = record.development;
        self.side_to_move = record.side_to_move;
        self.ply -= 1;
        Some(record)
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Minor-piece home squares that still hold their own side's minor piece.
fn undeveloped_minors(board: &Board) -> Bitboard {
    let minors = board.pieces(PieceKind::Knight) | board.pieces(PieceKind::Bishop);
    let white_home = MINOR_HOMES & Bitboard::RANK_1 & board.side(Side::White);
    let black_home = MINOR_HOMES & Bitboard::RANK_8 & board.side(Side::Black);
    minors & (white_home | black_home)
}
