//! An append-only log of moves that replays into a position.
//!
//! Passes are never written down. Whenever the player to move has no legal
//! move but the opponent does, replay passes on their behalf, so the board
//! and side to move are fully determined by the placed pieces.

use crate::board::Board;
use crate::error::GameError;
use crate::game::Player;
use crate::location::{Location, ParseLocationError};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GameRecord {
    moves: Vec<Location>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[Location] {
        &self.moves
    }

    pub(crate) fn push(&mut self, loc: Location) {
        self.moves.push(loc);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.moves.truncate(len);
    }

    /// Replay the record from the starting position. Returns the board from
    /// the perspective of the player to move, and that player.
    pub fn replay(&self) -> Result<(Board, Player), GameError> {
        self.moves.iter().try_fold(
            (Board::new(), Player::Black),
            |(board, player), &loc| {
                let (board, passed) = board.try_apply_move(loc)?.resolve_pass();
                let player = if passed { player } else { !player };
                Ok((board, player))
            },
        )
    }
}

/// Moves concatenated without separators: "f5d6c3".
impl Display for GameRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.moves.iter().try_for_each(|loc| write!(f, "{}", loc))
    }
}

/// Parse concatenated notation. Legality is only checked by [`GameRecord::replay`].
impl FromStr for GameRecord {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let moves = chars
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>().parse())
            .collect::<Result<Vec<Location>, _>>()?;

        Ok(Self { moves })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    #[test]
    fn empty_record_is_the_start() {
        assert_eq!(GameRecord::new().replay(), Ok((Board::new(), Player::Black)));
    }

    #[test]
    fn parse_and_print() {
        let record: GameRecord = "f5d6C3".parse().unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.to_string(), "f5d6c3");
        assert_eq!("f5d".parse::<GameRecord>(), Err(ParseLocationError));
        assert_eq!("f5z9".parse::<GameRecord>(), Err(ParseLocationError));
    }

    #[test]
    fn replay_alternates_players() {
        let record: GameRecord = "f5d6".parse().unwrap();
        let (board, player) = record.replay().unwrap();
        assert_eq!(player, Player::Black);
        assert_eq!(board.count_pieces(), 6);
    }

    #[test]
    fn replay_rejects_illegal_moves() {
        let record: GameRecord = "f5f5".parse().unwrap();
        assert_eq!(
            record.replay(),
            Err(GameError::IllegalMove("f5".parse().unwrap()))
        );
    }

    #[test]
    fn replay_absorbs_passes() {
        // White's c1 leaves black without a move, so white moves again.
        let record: GameRecord = "d3c3b3b2f5a3a1c1".parse().unwrap();
        let (board, player) = record.replay().unwrap();
        assert_eq!(player, Player::White);
        assert_eq!(board.get_moves().to_string(), "[e3, f6]");
        assert_eq!(
            codec::encode(board, player),
            "X-O------O------OOXX-------XX------XXX-------------------------- O;"
        );
    }
}
