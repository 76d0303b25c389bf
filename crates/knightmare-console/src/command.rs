//! Console command parsing.

use knightmare_core::{Move, Square};

use crate::error::GameError;

/// A parsed line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `e2,e4`, `e2 e4` or `e2e4` -- move a piece.
    Move(Move),
    /// `moves <square>` -- list the legal destinations of a piece.
    Moves(Square),
    /// `board` -- print the board again.
    Board,
    /// `undo` -- take back the last full turn.
    Undo,
    /// `help` -- list the commands.
    Help,
    /// `quit` -- leave the game.
    Quit,
}

/// Text printed for the `help` command.
pub const HELP: &str = "\
commands:
  e2,e4 | e2 e4 | e2e4   move the piece on e2 to e4
  moves <square>         list legal destinations of the piece on <square>
  board                  print the board
  undo                   take back your last move and the reply
  help                   show this text
  quit                   leave the game";

/// Parse a single line of console input into a [`Command`].
///
/// Input is case-insensitive. Commas and whitespace both separate tokens.
pub fn parse_command(line: &str) -> Result<Command, GameError> {
    let lowered = line.trim().to_ascii_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let unknown = || GameError::UnknownCommand {
        input: line.trim().to_string(),
    };

    match tokens.as_slice() {
        [] => Err(unknown()),
        ["board"] => Ok(Command::Board),
        ["undo"] => Ok(Command::Undo),
        ["help" | "?"] => Ok(Command::Help),
        ["quit" | "exit"] => Ok(Command::Quit),
        ["moves"] => Err(GameError::MissingArgument { command: "moves" }),
        ["moves", square] => Ok(Command::Moves(square.parse()?)),
        [from, to] => Ok(Command::Move(Move::new(from.parse()?, to.parse()?))),
        [pair] if pair.len() == 4 => Ok(Command::Move(pair.parse()?)),
        _ => Err(unknown()),
    }
}
