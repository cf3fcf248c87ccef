//! `cascade-othello` holds the game side of the cascade Othello agent.
//!
//! This package implements three levels of abstraction:
//!
//!  - [`bitboard`] contains the raw, unchecked operations for working with Othello boards:
//!    move masks, flips and the eight board symmetries.
//!  - [`Board`] implements the core game logic on top of [`bitboard`], always from the
//!    perspective of the player to move.
//!  - [`GameSession`] is a high-level, checked interface to one game: a [`GameRecord`]
//!    of moves, the board encoding derived from it (see [`codec`]), and which sides the
//!    agent may still play.

pub mod bitboard;
pub mod codec;
pub mod test_utils;

mod board;
mod error;
mod game;
mod location;
mod record;
mod session;
mod utils;

pub use board::*;
pub use error::*;
pub use game::*;
pub use location::*;
pub use record::*;
pub use session::*;

/// The number of spaces on one edge of an Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on an Othello board.
pub const NUM_SPACES: usize = 64;
