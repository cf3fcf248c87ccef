//! `cascade-player` picks moves for the cascade Othello agent.
//!
//! A [`MoveOracle`] tries, in order: a fixed opening move, a short exact
//! [`search`], the precomputed [`table`], and finally an external
//! [`solvers::Solver`] such as Edax. [`play_agent_move`] plays its answer into
//! a locked [`cascade_othello::GameSession`].

pub mod search;
pub mod solvers;
pub mod table;

mod agent;
mod config;
mod oracle;

pub use agent::*;
pub use config::*;
pub use oracle::*;
