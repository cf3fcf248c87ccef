//! Playing the oracle's move into a shared game session.

use crate::oracle::{MoveOracle, OracleError};
use crate::solvers::Solver;
use crate::table::TableStore;
use async_std::sync::Mutex;
use cascade_othello::{GameError, GameSession, Location, Player};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum AgentError {
    #[display(fmt = "{}", _0)]
    Game(GameError),

    /// The side to move has been played by hand.
    #[display(fmt = "{} can not be an agent", _0)]
    NotAllowed(#[error(not(source))] Player),

    #[display(fmt = "{}", _0)]
    Oracle(OracleError),
}

impl From<GameError> for AgentError {
    fn from(err: GameError) -> Self {
        AgentError::Game(err)
    }
}

impl From<OracleError> for AgentError {
    fn from(err: OracleError) -> Self {
        AgentError::Oracle(err)
    }
}

/// Let the oracle move for the side to move, if that side is still the agent's.
/// The session stays locked from the eligibility check until the move is recorded.
pub async fn play_agent_move<T: TableStore, S: Solver>(
    oracle: &MoveOracle<T, S>,
    session: &Mutex<GameSession>,
) -> Result<Location, AgentError> {
    let mut session = session.lock().await;
    if session.is_finished() {
        return Err(GameError::GameFinished.into());
    }

    let (board, player) = session.check_consistency()?;
    if !session.can_be_agent(player) {
        return Err(AgentError::NotAllowed(player));
    }

    let mv = oracle.choose_move(board).await?;
    session.apply_agent_move(mv)?;
    Ok(mv)
}
