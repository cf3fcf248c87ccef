use async_trait::async_trait;
use cascade_othello::{Board, Location};
use derive_more::{Display, Error};
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

#[derive(Debug, Display, Error)]
pub enum SolverError {
    #[display(fmt = "solver I/O failed: {}", _0)]
    Io(io::Error),

    #[display(fmt = "solver exited with {}", _0)]
    Failed(#[error(not(source))] ExitStatus),

    #[display(fmt = "solver gave no answer within {:?}", _0)]
    Timeout(#[error(not(source))] Duration),

    #[display(fmt = "no principal variation in solver output")]
    Unparseable,
}

impl From<io::Error> for SolverError {
    fn from(err: io::Error) -> Self {
        SolverError::Io(err)
    }
}

/// An exhaustive search engine, used when nothing cheaper has an answer.
#[async_trait]
pub trait Solver {
    /// Find the best move for the player to move.
    /// `board` must have at least one legal move.
    async fn solve(&self, board: Board) -> Result<Location, SolverError>;
}
