//! Errors raised by the game layer.

use crate::codec::ParseEncodingError;
use crate::location::Location;
use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq)]
pub enum GameError {
    /// Board text did not match the encoding grammar.
    #[display(fmt = "malformed board encoding: {}", _0)]
    MalformedEncoding(ParseEncodingError),

    /// The move is not legal for the player to move.
    #[display(fmt = "illegal move: {}", _0)]
    IllegalMove(#[error(not(source))] Location),

    #[display(fmt = "game is already finished")]
    GameFinished,

    #[display(fmt = "no move to undo")]
    NothingToUndo,

    /// The stored encoding no longer matches a replay of the record.
    #[display(fmt = "board encoding diverged from the game record")]
    InternalConsistency,
}

impl From<ParseEncodingError> for GameError {
    fn from(err: ParseEncodingError) -> Self {
        GameError::MalformedEncoding(err)
    }
}
