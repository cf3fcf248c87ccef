//! Command-line front end for the cascade agent.
//!
//! Set `RUST_LOG=info` to see which strategy chose each move.

use async_std::sync::Mutex;
use cascade_othello::{codec, Board, GameRecord, GameSession};
use cascade_player::{play_agent_move, EdaxConfig, MoveOracle, OracleConfig};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cascade-agent")]
#[command(about = "Othello agent backed by exact search, a lookup table and Edax", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the legal moves in a position
    Moves {
        #[command(flatten)]
        position: Position,
    },

    /// Choose the agent's move in a position
    Best {
        #[command(flatten)]
        position: Position,

        #[command(flatten)]
        oracle: OracleArgs,
    },

    /// Let the agent play both sides from a position to the end of the game
    Play {
        /// Moves played so far, e.g. "f5d6c3"
        #[arg(long, default_value = "")]
        record: String,

        #[command(flatten)]
        oracle: OracleArgs,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Position {
    /// 67-character board encoding
    #[arg(long)]
    board: Option<String>,

    /// Moves played from the start, e.g. "f5d6c3"
    #[arg(long)]
    record: Option<String>,
}

impl Position {
    fn resolve(&self) -> Result<Board, Box<dyn Error>> {
        if let Some(encoded) = &self.board {
            return Ok(codec::decode(encoded)?.0);
        }

        let record: GameRecord = self.record.as_deref().unwrap_or_default().parse()?;
        Ok(record.replay()?.0)
    }
}

#[derive(Args)]
struct OracleArgs {
    /// Moves the exact search looks ahead
    #[arg(long, default_value_t = 3)]
    depth: u8,

    /// Sorted lookup table file
    #[arg(long, default_value = "all_result_abtree_encoded_sorted_unique.csv")]
    table: PathBuf,

    /// Do not consult the lookup table
    #[arg(long)]
    no_table: bool,

    /// Edax executable
    #[arg(long, default_value = "./Edax_mod2")]
    edax: PathBuf,

    /// Run Edax directly instead of through `stdbuf -oL`
    #[arg(long)]
    no_stdbuf: bool,

    /// Seconds to wait for Edax
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

impl OracleArgs {
    fn to_config(&self) -> OracleConfig {
        let defaults = EdaxConfig::default();
        let edax = EdaxConfig {
            launcher: if self.no_stdbuf {
                Vec::new()
            } else {
                defaults.launcher.clone()
            },
            executable: self.edax.clone(),
            timeout: Duration::from_secs(self.timeout),
            ..defaults
        };

        OracleConfig {
            search_depth: self.depth,
            table_path: if self.no_table {
                None
            } else {
                Some(self.table.clone())
            },
            edax,
            ..OracleConfig::default()
        }
    }
}

#[async_std::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { position } => {
            let board = position.resolve()?;
            println!("{}", board);
            println!("{}", board.get_moves());
        }

        Commands::Best { position, oracle } => {
            let board = position.resolve()?;
            if !board.has_moves() {
                return Err("no legal moves in this position".into());
            }

            let oracle = MoveOracle::from_config(oracle.to_config())?;
            println!("{}", oracle.choose_move(board).await?);
        }

        Commands::Play { record, oracle } => {
            let record: GameRecord = record.parse()?;
            let session = Mutex::new(GameSession::from_record(record)?);
            let oracle = MoveOracle::from_config(oracle.to_config())?;

            while !session.lock().await.is_finished() {
                let mv = play_agent_move(&oracle, &session).await?;
                println!("{}", mv);
            }

            let session = session.lock().await;
            let (board, player) = codec::decode(session.encoding())?;
            println!("{}", session.record());
            println!("{}", board);
            println!(
                "final score for {}: {:+}",
                player,
                board.score_absolute_difference()
            );
        }
    }

    Ok(())
}
