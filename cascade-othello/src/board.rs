//! Core Othello game logic on a pair of bitboards.
//!
//! A [`Board`] is always seen from the perspective of the player to move:
//! making a move swaps the two bitboards. Hot loops should use
//! [`Board::get_moves`] and [`Board::apply_move`], which are unchecked;
//! anything driven by user input should go through [`Board::try_apply_move`].

use crate::bitboard::{self, Bitboard};
use crate::error::GameError;
use crate::location::{Location, LocationList};
use crate::utils;
use std::fmt;

/// The two players' pieces, from the perspective of the player to move.
/// The bitboards are disjoint.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Board {
    pub active_bitboard: Bitboard,
    pub opponent_bitboard: Bitboard,
}

impl Default for Board {
    /// The starting position from Black's perspective.
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting position from Black's perspective.
    pub const fn new() -> Self {
        Self {
            active_bitboard: bitboard::BLACK_START,
            opponent_bitboard: bitboard::WHITE_START,
        }
    }

    /// Build a board from raw bitboards. Panics if they overlap.
    pub fn from_bitboards(active: impl Into<Bitboard>, opponent: impl Into<Bitboard>) -> Self {
        let active_bitboard = active.into();
        let opponent_bitboard = opponent.into();
        assert!(
            (active_bitboard & opponent_bitboard).is_empty(),
            "a square cannot hold two pieces"
        );

        Self {
            active_bitboard,
            opponent_bitboard,
        }
    }

    /// Hand the move to the opponent without placing a piece.
    #[inline]
    pub fn pass(self) -> Self {
        Self {
            active_bitboard: self.opponent_bitboard,
            opponent_bitboard: self.active_bitboard,
        }
    }

    /// Get the legal moves for the active player.
    #[inline]
    pub fn get_moves(self) -> LocationList {
        bitboard::get_move_mask(self.active_bitboard, self.opponent_bitboard).into()
    }

    /// Whether the active player has at least one legal move.
    #[inline]
    pub fn has_moves(self) -> bool {
        !self.get_moves().is_empty()
    }

    /// Get the pieces that playing `loc` would flip.
    /// Errors if `loc` is not a legal move for the active player.
    pub fn get_flips(self, loc: Location) -> Result<Bitboard, GameError> {
        if !self.get_moves().contains(loc) {
            return Err(GameError::IllegalMove(loc));
        }

        Ok(bitboard::get_flips(
            self.active_bitboard,
            self.opponent_bitboard,
            loc.to_onehot(),
        ))
    }

    /// Make a move for the active player and return the board from the
    /// opponent's perspective. `loc` must be a legal move.
    #[inline]
    pub fn apply_move(self, loc: Location) -> Self {
        let (active, opponent) =
            bitboard::apply_move(self.active_bitboard, self.opponent_bitboard, loc.to_onehot());

        Self {
            active_bitboard: opponent,
            opponent_bitboard: active,
        }
    }

    /// Make a move for the active player after checking that it is legal.
    pub fn try_apply_move(self, loc: Location) -> Result<Self, GameError> {
        if !self.get_moves().contains(loc) {
            return Err(GameError::IllegalMove(loc));
        }

        Ok(self.apply_move(loc))
    }

    /// If the active player has no moves but the opponent does, pass.
    /// Returns the resulting board and whether a pass was made.
    #[inline]
    pub fn resolve_pass(self) -> (Self, bool) {
        if !self.has_moves() && self.pass().has_moves() {
            (self.pass(), true)
        } else {
            (self, false)
        }
    }

    /// True if neither player can move.
    #[inline]
    pub fn is_finished(self) -> bool {
        !self.has_moves() && !self.pass().has_moves()
    }

    /// Get a mask indicating where the occupied spaces are.
    #[inline]
    pub fn occupied_mask(self) -> Bitboard {
        self.active_bitboard | self.opponent_bitboard
    }

    /// Get a mask indicating where the empty spaces are.
    #[inline]
    pub fn empty_mask(self) -> Bitboard {
        !self.occupied_mask()
    }

    /// Number of pieces on the board.
    #[inline]
    pub fn count_pieces(self) -> u8 {
        self.occupied_mask().count_occupied()
    }

    /// Number of empty squares.
    #[inline]
    pub fn count_empties(self) -> u8 {
        self.occupied_mask().count_empty()
    }

    /// Score a board as: # my pieces - # opponent pieces.
    #[inline]
    pub fn score_absolute_difference(self) -> i8 {
        bitboard::score_absolute_difference(self.active_bitboard, self.opponent_bitboard)
    }

    /// Final score for the active player, with empty squares going to the winner.
    #[inline]
    pub fn score_winner_gets_empties(self) -> i8 {
        bitboard::score_winner_gets_empties(self.active_bitboard, self.opponent_bitboard)
    }

    /// The smallest of the 8 rotated or reflected copies of this board,
    /// ordered by (active, opponent) bitboards.
    pub fn canonical(self) -> Self {
        let actives = self.active_bitboard.symmetries();
        let opponents = self.opponent_bitboard.symmetries();

        actives
            .iter()
            .zip(opponents.iter())
            .map(|(&active_bitboard, &opponent_bitboard)| Self {
                active_bitboard,
                opponent_bitboard,
            })
            .fold(self, Self::min)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self
            .active_bitboard
            .into_iter()
            .zip(self.opponent_bitboard.into_iter())
            .map(|bits| match bits {
                (true, false) => '#',
                (false, true) => 'O',
                (false, false) => '.',
                (true, true) => '!',
            });

        utils::format_grid(cells, f)
    }
}
