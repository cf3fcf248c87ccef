//! The two sides of a game and how they are written down.

use derive_more::Display;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq)]
pub enum Player {
    #[display(fmt = "black")]
    Black,
    #[display(fmt = "white")]
    White,
}

impl Default for Player {
    /// Gets the starting player (black).
    fn default() -> Self {
        Self::Black
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

impl Player {
    /// The character for this player's pieces in a board encoding.
    pub fn to_char(self) -> char {
        match self {
            Player::Black => 'X',
            Player::White => 'O',
        }
    }

    /// Parse a board-encoding piece character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Player::Black),
            'O' => Some(Player::White),
            _ => None,
        }
    }

    /// Index for per-player tables.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}
