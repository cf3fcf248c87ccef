//! A single game in progress: the move record, its derived board encoding,
//! and who may still be played by the agent.
//!
//! Every mutation first re-derives the encoding from the record and refuses
//! to continue if the two disagree. Rejected operations leave the session
//! untouched.

use crate::board::Board;
use crate::codec;
use crate::error::GameError;
use crate::game::Player;
use crate::location::Location;
use crate::record::GameRecord;
use derive_more::Display;
use log::{debug, error};
use rand::seq::IteratorRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum GameStatus {
    #[display(fmt = "in_progress")]
    InProgress,
    #[display(fmt = "finished")]
    Finished,
}

/// The shortest record length at which a side was moved by hand.
/// `None` means the side never was, so the agent may play it.
pub type Watermark = Option<usize>;

#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    record: GameRecord,
    encoding: String,
    status: GameStatus,
    watermarks: [Watermark; 2],
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// A fresh game at the starting position.
    pub fn new() -> Self {
        Self {
            record: GameRecord::new(),
            encoding: codec::encode(Board::new(), Player::Black),
            status: GameStatus::InProgress,
            watermarks: [None, None],
        }
    }

    /// Resume a game from a record. Neither side has been moved by hand.
    pub fn from_record(record: GameRecord) -> Result<Self, GameError> {
        let (board, player) = record.replay()?;
        let status = if board.has_moves() {
            GameStatus::InProgress
        } else {
            GameStatus::Finished
        };

        Ok(Self {
            record,
            encoding: codec::encode(board, player),
            status,
            watermarks: [None, None],
        })
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn watermark(&self, player: Player) -> Watermark {
        self.watermarks[player.index()]
    }

    /// The board (from the mover's perspective) and the player to move.
    pub fn position(&self) -> Result<(Board, Player), GameError> {
        Ok(codec::decode(&self.encoding)?)
    }

    pub fn side_to_move(&self) -> Result<Player, GameError> {
        self.position().map(|(_, player)| player)
    }

    pub fn count_empties(&self) -> usize {
        self.encoding.matches('-').count()
    }

    /// Whether the agent may move for `player`: true until that side is moved by hand.
    pub fn can_be_agent(&self, player: Player) -> bool {
        self.watermark(player).is_none()
    }

    /// Whether the agent may move for the side currently to move.
    pub fn is_agent_eligible(&self) -> Result<bool, GameError> {
        Ok(self.can_be_agent(self.side_to_move()?))
    }

    /// Play a move by hand for the side to move.
    pub fn apply_move(&mut self, loc: Location) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let (board, player) = self.check_consistency()?;
        board.try_apply_move(loc)?;

        let watermarks = self.lowered_watermarks(player);
        self.commit(loc, watermarks)
    }

    /// Play a uniformly random legal move by hand for the side to move.
    pub fn apply_random_move(&mut self) -> Result<Location, GameError> {
        self.apply_random_move_with(&mut rand::thread_rng())
    }

    pub fn apply_random_move_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Location, GameError> {
        self.ensure_in_progress()?;
        let (board, player) = self.check_consistency()?;
        let loc = match board.get_moves().choose(rng) {
            Some(loc) => loc,
            None => {
                error!("game in progress but {} has no legal move", player);
                return Err(GameError::InternalConsistency);
            }
        };

        let watermarks = self.lowered_watermarks(player);
        self.commit(loc, watermarks)?;
        Ok(loc)
    }

    /// Play a move chosen by the agent. Unlike [`GameSession::apply_move`],
    /// this does not revoke the agent's right to play this side.
    pub fn apply_agent_move(&mut self, loc: Location) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let (board, _) = self.check_consistency()?;
        board.try_apply_move(loc)?;

        self.commit(loc, self.watermarks)
    }

    /// Take back the last recorded move. Passes are never recorded, so any
    /// pass the removed move forced disappears with it. A watermark set at
    /// the restored position is cleared.
    pub fn undo(&mut self) -> Result<(), GameError> {
        if self.record.is_empty() {
            return Err(GameError::NothingToUndo);
        }
        self.check_consistency()?;

        let mut record = self.record.clone();
        let len = record.len() - 1;
        record.truncate(len);
        let (board, player) = record.replay()?;

        for mark in self.watermarks.iter_mut() {
            if *mark == Some(len) {
                *mark = None;
            }
        }
        self.record = record;
        self.encoding = codec::encode(board, player);
        self.status = GameStatus::InProgress;
        debug!("undo to {} moves: {}", len, self.encoding);

        Ok(())
    }

    /// Go back to the starting position with an empty record.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replay the record and compare it with the stored encoding.
    /// Returns the replayed position if they agree.
    pub fn check_consistency(&self) -> Result<(Board, Player), GameError> {
        let replayed = self.record.replay().map_err(|err| {
            error!("record {} does not replay: {}", self.record, err);
            GameError::InternalConsistency
        })?;

        let expected = codec::encode(replayed.0, replayed.1);
        if expected != self.encoding {
            error!(
                "encoding {:?} does not match record {} ({:?})",
                self.encoding, self.record, expected
            );
            return Err(GameError::InternalConsistency);
        }

        Ok(replayed)
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Finished => Err(GameError::GameFinished),
            GameStatus::InProgress => Ok(()),
        }
    }

    /// Watermarks after `player` makes a move by hand at the current record length.
    fn lowered_watermarks(&self, player: Player) -> [Watermark; 2] {
        let len = self.record.len();
        let mut watermarks = self.watermarks;
        let mark = &mut watermarks[player.index()];
        *mark = Some(mark.map_or(len, |m| m.min(len)));
        watermarks
    }

    /// Append a legal move, re-deriving the encoding from the full record.
    fn commit(&mut self, loc: Location, watermarks: [Watermark; 2]) -> Result<(), GameError> {
        let mut record = self.record.clone();
        record.push(loc);
        let (board, player) = record.replay()?;

        self.record = record;
        self.encoding = codec::encode(board, player);
        self.watermarks = watermarks;
        if !board.has_moves() {
            self.status = GameStatus::Finished;
        }
        debug!("played {}: {} ({})", loc, self.encoding, self.status);

        Ok(())
    }
}
