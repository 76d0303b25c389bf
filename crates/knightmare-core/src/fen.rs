//! FEN parsing and serialization for [`Position`].
//!
//! Castling is not part of the game, so the castling field is accepted and
//! ignored on input and always written as `-`. Only the placement and side
//! fields are mandatory; missing trailing fields take their usual defaults.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::error::FenError;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::side::Side;
use crate::square::Square;

/// The standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut board = Board::empty();
    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file: usize = 0;
        for c in text.chars() {
            if let Some(digit) = c.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                file += digit as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            let sq = Square::from_coords(file as u8, rank).ok_or(FenError::BadRankLength {
                rank: rank + 1,
                length: file + 1,
            })?;
            board.set_piece(piece, sq);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadRankLength {
                rank: rank + 1,
                length: file,
            });
        }
    }
    Ok(board)
}

fn parse_counter(field: &'static str, text: Option<&str>, default: u32) -> Result<u32, FenError> {
    match text {
        None => Ok(default),
        Some(text) => text.parse::<u32>().map_err(|_| FenError::InvalidCounter {
            field,
            found: text.to_string(),
        }),
    }
}

/// `true` if `target` can be the square skipped by a double push of
/// `pusher`: it is empty, the pawn stands just past it and the square the
/// pawn started from is empty.
fn double_push_left(board: &Board, target: Square, pusher: Side) -> bool {
    let pawn = Piece::new(PieceKind::Pawn, pusher);
    let landed = target.offset(0, pusher.forward());
    let origin = target.offset(0, -pusher.forward());
    board.piece_at(target).is_none()
        && landed.and_then(|sq| board.piece_at(sq)) == Some(pawn)
        && origin.is_some_and(|sq| board.piece_at(sq).is_none())
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(FenError::MissingFields { found: fields.len() });
        }

        let mut board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => {
                return Err(FenError::InvalidSide {
                    found: other.to_string(),
                });
            }
        };

        match fields.get(3).copied() {
            None | Some("-") => {}
            Some(text) => {
                let invalid = || FenError::InvalidEnPassant {
                    found: text.to_string(),
                };
                let sq: Square = text.parse().map_err(|_| invalid())?;
                if sq.rank() != side_to_move.en_passant_rank()
                    || !double_push_left(&board, sq, side_to_move.opponent())
                {
                    return Err(invalid());
                }
                board.set_en_passant(sq.bitboard());
            }
        }

        parse_counter("halfmove clock", fields.get(4).copied(), 0)?;
        let fullmove = parse_counter("fullmove number", fields.get(5).copied(), 1)?.max(1);
        let black_offset = u32::from(side_to_move == Side::Black);
        let ply = (fullmove - 1)
            .checked_mul(2)
            .and_then(|ply| ply.checked_add(black_offset))
            .ok_or_else(|| FenError::InvalidCounter {
                field: "fullmove number",
                found: fields.get(5).copied().unwrap_or_default().to_string(),
            })?;

        let mut position = Position::from_board(board, side_to_move)?;
        let waiting = side_to_move.opponent();
        if position.in_check(waiting) {
            return Err(FenError::SideNotToMoveInCheck { side: waiting });
        }
        position.set_ply(ply);
        Ok(position)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board();
        for rank in (0u8..8).rev() {
            let mut empty = 0u8;
            for file in 0u8..8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| board.piece_at(sq));
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        let side = match self.side_to_move() {
            Side::White => 'w',
            Side::Black => 'b',
        };
        write!(f, " {side} -")?;

        match board.en_passant().lsb() {
            Some(sq) => write!(f, " {sq}")?,
            None => f.write_str(" -")?,
        }

        write!(f, " 0 {}", self.ply() / 2 + 1)
    }
}
