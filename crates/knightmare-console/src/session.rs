//! Console game loop over any line-based input and text output.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use knightmare_core::{
    DEFAULT_PLY_LIMIT, GameStatus, Move, MoveOutcome, Position, PositionError, Side, Square,
};
use knightmare_engine::{SearchConfig, SearchLimits};

use crate::command::{Command, HELP, parse_command};
use crate::error::GameError;
use crate::game::Game;

/// Who plays whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The engine plays both sides.
    #[default]
    AiVsAi,
    /// A human plays one side from the input stream.
    HumanVsAi,
    /// Both sides are entered from the input stream.
    HumanVsHuman,
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub search: SearchConfig,
    pub limits: SearchLimits,
    /// Plies after which the game is drawn.
    pub ply_limit: u32,
    /// The human's side in [`Mode::HumanVsAi`]. Ignored otherwise.
    pub human: Side,
    /// Starting position; the standard one when `None`.
    pub fen: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::AiVsAi,
            search: SearchConfig::default(),
            limits: SearchLimits::default(),
            ply_limit: DEFAULT_PLY_LIMIT,
            human: Side::White,
            fen: None,
        }
    }
}

/// What the human's input asked for.
enum Turn {
    Continue,
    Quit,
}

/// A single game played over `input` and `output`.
///
/// The board is printed after every move and the result once the game
/// ends. Bad human input is reported on `output` and asked for again.
pub struct Session<R, W> {
    game: Game,
    /// Indexed by [`Side::index`].
    humans: [bool; 2],
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: SessionConfig, input: R, output: W) -> Result<Self, GameError> {
        let position = match config.fen.as_deref() {
            Some(fen) => fen.parse::<Position>()?,
            None => Position::new(),
        };
        let game = Game::from_position(position, config.search)
            .with_limits(config.limits)
            .with_ply_limit(config.ply_limit);
        let humans = match config.mode {
            Mode::AiVsAi => [false; 2],
            Mode::HumanVsAi => {
                let mut humans = [false; 2];
                humans[config.human.index()] = true;
                humans
            }
            Mode::HumanVsHuman => [true; 2],
        };
        Ok(Self {
            game,
            humans,
            input,
            output,
        })
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    fn is_human(&self, side: Side) -> bool {
        self.humans[side.index()]
    }

    /// Play until the game ends, the human quits or input closes.
    ///
    /// Returns the final status, `GameStatus::Ongoing` when the game was
    /// abandoned.
    pub fn run(&mut self) -> Result<GameStatus, GameError> {
        info!(humans = ?self.humans, fen = %self.game.position(), "session starting");
        writeln!(self.output, "{}\n", self.game.board())?;

        loop {
            let status = self.game.status();
            if status.is_terminal() {
                self.report(status)?;
                info!(%status, ply = self.game.position().ply(), "game over");
                return Ok(status);
            }

            let side = self.game.side_to_move();
            if self.is_human(side) {
                if let Turn::Quit = self.human_turn(side)? {
                    writeln!(self.output, "game abandoned")?;
                    info!(ply = self.game.position().ply(), "session abandoned");
                    return Ok(status);
                }
            } else {
                self.engine_turn(side)?;
            }
        }
    }

    fn engine_turn(&mut self, side: Side) -> Result<(), GameError> {
        if let Some((mv, outcome)) = self.game.play_engine_move()? {
            self.show_move(side, mv, outcome)?;
        }
        Ok(())
    }

    fn human_turn(&mut self, side: Side) -> Result<Turn, GameError> {
        write!(self.output, "{side} to move> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(Turn::Quit);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Turn::Continue);
        }
        debug!(cmd = %trimmed, "received console command");

        let command = match parse_command(trimmed) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "console parse error");
                writeln!(self.output, "{e}")?;
                return Ok(Turn::Continue);
            }
        };

        match command {
            Command::Move(mv) => match self.game.play_move(mv) {
                Ok(outcome) => self.show_move(side, mv, outcome)?,
                Err(e @ GameError::Position(PositionError::IllegalMove { .. })) => {
                    warn!(error = %e, "move refused");
                    writeln!(self.output, "{e}")?;
                }
                Err(e) => return Err(e),
            },
            Command::Moves(square) => self.show_destinations(square)?,
            Command::Board => writeln!(self.output, "{}\n", self.game.board())?,
            Command::Undo => self.undo_turn()?,
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return Ok(Turn::Quit),
        }
        Ok(Turn::Continue)
    }

    fn show_move(&mut self, side: Side, mv: Move, outcome: MoveOutcome) -> Result<(), GameError> {
        if outcome.in_check && !outcome.status.is_terminal() {
            writeln!(self.output, "{side} plays {mv}, check")?;
        } else {
            writeln!(self.output, "{side} plays {mv}")?;
        }
        writeln!(self.output, "{}\n", self.game.board())?;
        Ok(())
    }

    fn show_destinations(&mut self, square: Square) -> Result<(), GameError> {
        let destinations = self.game.legal_moves_from(square);
        if destinations.is_empty() {
            writeln!(self.output, "no legal moves from {square}")?;
            return Ok(());
        }
        let list: Vec<String> = destinations.iter().map(Square::to_string).collect();
        writeln!(self.output, "{square}: {}", list.join(" "))?;
        Ok(())
    }

    /// Take moves back until a human is to move again.
    fn undo_turn(&mut self) -> Result<(), GameError> {
        let mut taken: Vec<String> = Vec::new();
        while let Some(mv) = self.game.undo() {
            taken.push(mv.to_string());
            if self.is_human(self.game.side_to_move()) {
                break;
            }
        }
        if taken.is_empty() {
            writeln!(self.output, "nothing to undo")?;
        } else {
            writeln!(self.output, "took back {}", taken.join(" "))?;
            writeln!(self.output, "{}\n", self.game.board())?;
        }
        Ok(())
    }

    fn report(&mut self, status: GameStatus) -> Result<(), GameError> {
        match status {
            GameStatus::Checkmate => {
                let winner = self.game.side_to_move().opponent();
                writeln!(self.output, "checkmate: {winner} wins")?;
            }
            GameStatus::Draw(_) => writeln!(self.output, "{status}")?,
            GameStatus::Ongoing => {}
        }
        Ok(())
    }
}
