//! Solvers are external engines that can search a position to the end of the game.

mod edax;
mod solver;

pub use edax::{parse_principal_move, search_window, worker_count, EdaxSolver};
pub use solver::{Solver, SolverError};
