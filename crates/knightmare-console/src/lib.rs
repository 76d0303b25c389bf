//! Console front end for knightmare: a validated game facade, command
//! parsing and an interactive session loop.

pub mod command;
pub mod error;
pub mod game;
pub mod session;

pub use command::{Command, parse_command};
pub use error::GameError;
pub use game::Game;
pub use session::{Mode, Session, SessionConfig};
