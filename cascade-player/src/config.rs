//! Tunable settings for the move oracle and the Edax solver.

use cascade_othello::Location;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for [`crate::MoveOracle`].
#[derive(Clone, Debug, PartialEq)]
pub struct OracleConfig {
    /// Moves the exact search may look ahead.
    pub search_depth: u8,

    /// The table is only consulted with fewer discs than this on the board.
    pub table_disc_limit: u8,

    /// Played in the starting position.
    pub opening_move: Location,

    /// Sorted table file. `None` skips the table.
    pub table_path: Option<PathBuf>,

    pub edax: EdaxConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            search_depth: 3,
            table_disc_limit: 28,
            // F5
            opening_move: Location::from_index(37),
            table_path: Some(PathBuf::from("all_result_abtree_encoded_sorted_unique.csv")),
            edax: EdaxConfig::default(),
        }
    }
}

/// How to run Edax.
#[derive(Clone, Debug, PartialEq)]
pub struct EdaxConfig {
    /// Program and arguments the executable is run through.
    pub launcher: Vec<String>,
    pub executable: PathBuf,

    /// Directory for the board files written before each run. Every run
    /// gets its own file, removed once Edax is done with it.
    pub board_dir: PathBuf,

    pub level: u32,
    pub hash_table_size: u32,
    pub width: u32,
    pub max_workers: usize,
    pub timeout: Duration,

    /// Below this many empty squares, search for the exact score instead of
    /// just win/loss/draw.
    pub endgame_empties: u8,
}

impl Default for EdaxConfig {
    fn default() -> Self {
        Self {
            launcher: vec!["stdbuf".to_string(), "-oL".to_string()],
            executable: PathBuf::from("./Edax_mod2"),
            board_dir: std::env::temp_dir(),
            level: 60,
            hash_table_size: 23,
            width: 200,
            max_workers: 8,
            timeout: Duration::from_secs(120),
            endgame_empties: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opening_is_f5() {
        assert_eq!(OracleConfig::default().opening_move.to_string(), "f5");
    }
}
