//! A game as seen by a front end: squares in, moves and board text out.

use std::collections::BTreeMap;

use tracing::{debug, info};

use knightmare_core::{GameStatus, Move, MoveOutcome, Position, Side, Square};
use knightmare_engine::{SearchConfig, SearchEngine, SearchLimits};

use crate::error::GameError;

/// Owns the position and the engine playing on it.
///
/// Every move entering through [`Game::play`] is validated against the side
/// to move and the legal move set, so a refused move leaves the game as it
/// was.
#[derive(Debug)]
pub struct Game {
    position: Position,
    engine: SearchEngine,
}

impl Game {
    /// A game from the starting position.
    pub fn new(config: SearchConfig) -> Game {
        Game::from_position(Position::new(), config)
    }

    pub fn from_position(position: Position, config: SearchConfig) -> Game {
        Game {
            position,
            engine: SearchEngine::new(config),
        }
    }

    /// A game from a FEN string.
    pub fn from_fen(fen: &str, config: SearchConfig) -> Result<Game, GameError> {
        Ok(Game::from_position(fen.parse()?, config))
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Game {
        self.engine = self.engine.with_limits(limits);
        self
    }

    pub fn with_ply_limit(mut self, limit: u32) -> Game {
        self.position.set_ply_limit(limit);
        self
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.position.side_to_move()
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    /// Legal destinations of the piece on `square`, in square order. Empty
    /// when the square is empty or the piece cannot move.
    pub fn legal_moves(&self, square: &str) -> Result<Vec<Square>, GameError> {
        Ok(self.legal_moves_from(square.parse()?))
    }

    pub fn legal_moves_from(&self, square: Square) -> Vec<Square> {
        self.position.legal_moves(square).collect()
    }

    /// Every piece of `side` that can move, mapped to its destinations.
    pub fn legal_move_map(&self, side: Side) -> BTreeMap<Square, Vec<Square>> {
        let mut map: BTreeMap<Square, Vec<Square>> = BTreeMap::new();
        for mv in &self.position.legal_moves_for(side) {
            map.entry(mv.from).or_default().push(mv.to);
        }
        for destinations in map.values_mut() {
            destinations.sort_unstable();
        }
        map
    }

    /// Play a move given in square notation.
    pub fn play(&mut self, from: &str, to: &str) -> Result<MoveOutcome, GameError> {
        self.play_move(Move::new(from.parse()?, to.parse()?))
    }

    /// Play a move for the side to move.
    pub fn play_move(&mut self, mv: Move) -> Result<MoveOutcome, GameError> {
        let side = self.side_to_move();
        let outcome = self.position.play(mv.from, mv.to)?;
        debug!(%side, mv = %mv, status = %outcome.status, "move played");
        Ok(outcome)
    }

    /// The move the engine would play for `side`, without playing it.
    pub fn engine_move(&mut self, side: Side) -> Result<Option<Move>, GameError> {
        let result = self.engine.search(&mut self.position, side)?;
        info!(
            %side,
            best = ?result.best_move,
            score = result.score,
            nodes = result.nodes,
            "engine move"
        );
        Ok(result.best_move)
    }

    /// Let the engine choose and play a move for the side to move. `None`
    /// when that side has no legal move.
    pub fn play_engine_move(&mut self) -> Result<Option<(Move, MoveOutcome)>, GameError> {
        let Some(mv) = self.engine_move(self.side_to_move())? else {
            return Ok(None);
        };
        let outcome = self.play_move(mv)?;
        Ok(Some((mv, outcome)))
    }

    /// Take back the last move played, if any.
    pub fn undo(&mut self) -> Option<Move> {
        self.position.undo_last().map(|record| record.as_move())
    }

    /// Text dump of the board, White at the bottom.
    pub fn board(&self) -> String {
        self.position.board().pretty().to_string()
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knightmare_core::{DrawKind, IllegalMoveReason, PositionError};

    fn shallow() -> SearchConfig {
        SearchConfig {
            depth: 2,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn legal_moves_by_notation() {
        let game = Game::default();
        assert_eq!(game.legal_moves("b1").unwrap(), vec![Square::A3, Square::C3]);
        assert!(game.legal_moves("e4").unwrap().is_empty());
        assert!(matches!(game.legal_moves("j1"), Err(GameError::InvalidSquare(_))));
    }

    #[test]
    fn legal_move_map_covers_all_movers() {
        let game = Game::default();
        let map = game.legal_move_map(Side::White);
        assert_eq!(map.len(), 10);
        assert_eq!(map.values().map(Vec::len).sum::<usize>(), 20);
        assert_eq!(map[&Square::G1], vec![Square::F3, Square::H3]);
        assert!(!map.contains_key(&Square::E1));

        let black = game.legal_move_map(Side::Black);
        assert_eq!(black[&Square::E7], vec![Square::E5, Square::E6]);
    }

    #[test]
    fn play_validates_at_the_boundary() {
        let mut game = Game::default();
        assert!(matches!(game.play("e2", "e9"), Err(GameError::InvalidSquare(_))));
        assert!(matches!(
            game.play("e7", "e5"),
            Err(GameError::Position(PositionError::IllegalMove {
                reason: IllegalMoveReason::WrongSide,
                ..
            }))
        ));
        assert!(matches!(
            game.play("e2", "e5"),
            Err(GameError::Position(PositionError::IllegalMove {
                reason: IllegalMoveReason::NotLegal,
                ..
            }))
        ));
        assert!(matches!(
            game.play("e3", "e4"),
            Err(GameError::Position(PositionError::IllegalMove {
                reason: IllegalMoveReason::EmptySource,
                ..
            }))
        ));
        assert_eq!(game.position(), &Position::new());

        game.play("e2", "e4").unwrap();
        assert_eq!(game.side_to_move(), Side::Black);
    }

    #[test]
    fn engine_move_leaves_position_alone() {
        let mut game = Game::new(shallow());
        let before = game.position().clone();
        let mv = game.engine_move(Side::White).unwrap().unwrap();
        assert_eq!(game.position(), &before);
        assert!(game.legal_moves_from(mv.from).contains(&mv.to));
    }

    #[test]
    fn engine_plays_mate_in_one() {
        let mut game = Game::from_fen("7k/8/5K2/6Q1/8/8/8/8 w", shallow()).unwrap();
        let (_, outcome) = game.play_engine_move().unwrap().unwrap();
        assert_eq!(outcome.status, GameStatus::Checkmate);
        assert_eq!(game.status(), GameStatus::Checkmate);
        assert_eq!(game.play_engine_move().unwrap(), None);
    }

    #[test]
    fn undo_returns_the_move() {
        let mut game = Game::default();
        assert_eq!(game.undo(), None);
        game.play("g1", "f3").unwrap();
        assert_eq!(game.undo(), Some(Move::new(Square::G1, Square::F3)));
        assert_eq!(game.position(), &Position::new());
    }

    #[test]
    fn ply_limit_ends_the_game() {
        let mut game = Game::default().with_ply_limit(2);
        game.play("g1", "f3").unwrap();
        let outcome = game.play_move(Move::new(Square::G8, Square::F6)).unwrap();
        assert_eq!(outcome.status, GameStatus::Draw(DrawKind::PlyLimit));
    }

    #[test]
    fn board_dump_has_labels() {
        let text = Game::default().board();
        assert!(text.starts_with("8  r n b q k b n r"));
        assert!(text.ends_with("   a b c d e f g h"));
    }

    #[test]
    fn bad_fen_is_reported() {
        assert!(matches!(
            Game::from_fen("8/8/8 w", shallow()),
            Err(GameError::InvalidFen(_))
        ));
    }
}
