//! Move selection by a cascade of increasingly expensive strategies:
//! a fixed opening move, a short exact search, the lookup table, and
//! finally an exhaustive external solver.

use crate::config::OracleConfig;
use crate::search;
use crate::solvers::{EdaxSolver, Solver, SolverError};
use crate::table::{self, SortedTableFile, TableError, TableStore};
use cascade_othello::{Board, Location};
use derive_more::{Display, Error};
use log::{info, warn};

#[derive(Debug, Display, Error)]
pub enum OracleError {
    /// The last-resort solver failed, so nothing produced a move.
    #[display(fmt = "no strategy produced a move: {}", _0)]
    Exhausted(SolverError),

    #[display(fmt = "could not load the lookup table: {}", _0)]
    Table(TableError),

    /// The solver answered with a move that cannot be played.
    #[display(fmt = "solver chose illegal move {}", _0)]
    IllegalAnswer(#[error(not(source))] Location),
}

impl From<SolverError> for OracleError {
    fn from(err: SolverError) -> Self {
        OracleError::Exhausted(err)
    }
}

impl From<TableError> for OracleError {
    fn from(err: TableError) -> Self {
        OracleError::Table(err)
    }
}

pub struct MoveOracle<T, S> {
    config: OracleConfig,
    table: Option<T>,
    solver: S,
}

impl MoveOracle<SortedTableFile, EdaxSolver> {
    /// Open the configured table and set up Edax.
    pub fn from_config(config: OracleConfig) -> Result<Self, OracleError> {
        let table = match &config.table_path {
            Some(path) => Some(SortedTableFile::open(path)?),
            None => None,
        };
        let solver = EdaxSolver::new(config.edax.clone());

        Ok(Self::new(config, table, solver))
    }
}

impl<T: TableStore, S: Solver> MoveOracle<T, S> {
    pub fn new(config: OracleConfig, table: Option<T>, solver: S) -> Self {
        Self {
            config,
            table,
            solver,
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Choose a move for the player to move. `board` must have a legal move.
    pub async fn choose_move(&self, board: Board) -> Result<Location, OracleError> {
        if board.count_pieces() == 4 {
            info!("opening move: {}", self.config.opening_move);
            return Ok(self.config.opening_move);
        }

        if let Some((score, mv)) = search::search_root(board, self.config.search_depth) {
            info!("exact search answer: {} (final score {:+})", mv, score);
            return Ok(mv);
        }

        if board.count_pieces() < self.config.table_disc_limit {
            if let Some(table) = &self.table {
                match table::best_move_from_table(table, board) {
                    Ok(Some(choice)) => {
                        info!("table answer: {} ({})", choice.location, choice.outcome);
                        return Ok(choice.location);
                    }
                    Ok(None) => (),
                    Err(err) => warn!("table lookup failed, falling back to solver: {}", err),
                }
            }
        }

        let mv = self.solver.solve(board).await?;
        if !board.get_moves().contains(mv) {
            return Err(OracleError::IllegalAnswer(mv));
        }
        info!("solver answer: {}", mv);

        Ok(mv)
    }
}
