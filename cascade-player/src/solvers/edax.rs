//! [`Solver`] that runs [Edax](https://github.com/abulmo/edax-reversi) on a board file.

use super::{Solver, SolverError};
use crate::config::EdaxConfig;
use async_std::future;
use async_std::io::BufReader;
use async_std::prelude::*;
use async_std::process::{Command, Stdio};
use async_trait::async_trait;
use cascade_othello::{codec, Board, Location, Player};
use itertools::Itertools;
use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static BOARD_FILES: AtomicUsize = AtomicUsize::new(0);

pub struct EdaxSolver {
    config: EdaxConfig,
}

impl EdaxSolver {
    pub fn new(config: EdaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EdaxConfig {
        &self.config
    }

    /// A board file name no other run in any process is using.
    fn next_board_path(&self) -> PathBuf {
        let n = BOARD_FILES.fetch_add(1, Ordering::Relaxed);
        self.config
            .board_dir
            .join(format!("cascade-edax-{}-{}.obf", std::process::id(), n))
    }

    /// Arguments passed to the Edax executable for a position with `empties`
    /// empty squares, written to `board_path`.
    pub fn arguments(&self, empties: u8, board_path: &Path) -> Vec<String> {
        let window = search_window(empties, self.config.endgame_empties);
        vec![
            "-solve".to_string(),
            board_path.display().to_string(),
            "-n-tasks".to_string(),
            worker_count(self.config.max_workers).to_string(),
            "-level".to_string(),
            self.config.level.to_string(),
            "-hash-table-size".to_string(),
            self.config.hash_table_size.to_string(),
            "-verbose".to_string(),
            "2".to_string(),
            "-alpha".to_string(),
            format!("-{}", window),
            "-beta".to_string(),
            window.to_string(),
            "-width".to_string(),
            self.config.width.to_string(),
        ]
    }

    /// The full command line, launcher included, for logging.
    pub fn command_line(&self, empties: u8, board_path: &Path) -> String {
        self.config
            .launcher
            .iter()
            .cloned()
            .chain(std::iter::once(self.config.executable.display().to_string()))
            .chain(self.arguments(empties, board_path))
            .join(" ")
    }

    fn command(&self, empties: u8, board_path: &Path) -> Command {
        let mut command = match self.config.launcher.split_first() {
            Some((program, launcher_args)) => {
                let mut command = Command::new(program);
                command.args(launcher_args).arg(&self.config.executable);
                command
            }
            None => Command::new(&self.config.executable),
        };

        command
            .args(self.arguments(empties, board_path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

/// Run `command` to completion and collect its standard output by line.
async fn run_to_completion(mut command: Command) -> Result<Vec<String>, SolverError> {
    let mut child = command.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| SolverError::Io(std::io::ErrorKind::BrokenPipe.into()))?;

    let mut trace = Vec::new();
    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines.next().await {
        trace.push(line?.trim_end().to_string());
    }

    // End of output does not mean the process is gone.
    let status = child.status().await?;
    debug!("edax exited with {} after {} lines", status, trace.len());
    if !status.success() {
        return Err(SolverError::Failed(status));
    }

    Ok(trace)
}

#[async_trait]
impl Solver for EdaxSolver {
    async fn solve(&self, board: Board) -> Result<Location, SolverError> {
        // Edax reads the side to move from the file, so the mover is always X.
        let encoded = codec::encode(board, Player::Black);
        let board_path = self.next_board_path();
        async_std::fs::write(&board_path, format!("{}\n", encoded)).await?;

        let empties = board.count_empties();
        debug!("running {}", self.command_line(empties, &board_path));
        let command = self.command(empties, &board_path);

        let finished = future::timeout(self.config.timeout, run_to_completion(command))
            .await
            .map_err(|_| SolverError::Timeout(self.config.timeout));

        match async_std::fs::remove_file(&board_path).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                warn!("could not remove {}: {}", board_path.display(), err)
            }
            _ => {}
        }

        parse_principal_move(&finished??)
    }
}

/// Half-width of the alpha-beta window: the full score range near the end of
/// the game, otherwise just enough to tell a win from a loss.
pub fn search_window(empties: u8, endgame_empties: u8) -> i8 {
    if empties < endgame_empties {
        64
    } else {
        1
    }
}

/// Available CPUs, at least 1 and at most `max_workers`.
pub fn worker_count(max_workers: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    available.min(max_workers).max(1)
}

fn is_pass_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("ps") || token.eq_ignore_ascii_case("pa")
}

/// Find the first move of the principal variation in an Edax verbose trace.
///
/// Result lines end in the variation, e.g.
/// `  1|   14   +18   0:00.002   3123   1561500 g8 H7 a8 A6 a3 B2`,
/// and the last such line holds the final answer.
pub fn parse_principal_move<S: AsRef<str>>(trace: &[S]) -> Result<Location, SolverError> {
    for line in trace.iter().rev() {
        let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
        let variation_len = tokens
            .iter()
            .rev()
            .take_while(|token| token.parse::<Location>().is_ok() || is_pass_token(token))
            .count();

        // A line of nothing but moves is not a result line.
        if variation_len == 0 || variation_len == tokens.len() {
            continue;
        }

        let first = tokens[tokens.len() - variation_len];
        return first.parse().map_err(|_| SolverError::Unparseable);
    }

    Err(SolverError::Unparseable)
}
