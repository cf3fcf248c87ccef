//! Conversion between [`Board`]s and the 67-character board encoding.
//!
//! The encoding is 64 cells in square order (A1, B1, ..., H8), each `X`
//! (black), `O` (white) or `-` (empty), then a space, the side to move and a
//! terminating `;`:
//!
//! ```text
//! ---------------------------OX------XO--------------------------- X;
//! ```
//!
//! This is also the board-file format read by the Edax solver.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::game::Player;
use crate::NUM_SPACES;
use derive_more::{Display, Error};

/// Length of an encoded board, separator, side and terminator included.
pub const ENCODING_LENGTH: usize = NUM_SPACES + 3;

const EMPTY_CELL: char = '-';

#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
pub enum ParseEncodingError {
    #[display(fmt = "expected {} characters, found {}", ENCODING_LENGTH, _0)]
    WrongLength(#[error(not(source))] usize),

    #[display(fmt = "invalid cell {:?} at square {}", found, index)]
    InvalidCell { index: usize, found: char },

    #[display(fmt = "expected a space after the board")]
    MissingSeparator,

    #[display(fmt = "invalid side to move {:?}", _0)]
    InvalidSide(#[error(not(source))] char),

    #[display(fmt = "expected a terminating ';'")]
    MissingTerminator,
}

/// Encode `board`, seen from `player`'s perspective, with `player` to move.
pub fn encode(board: Board, player: Player) -> String {
    let mut encoded = String::with_capacity(ENCODING_LENGTH);

    let cells = board
        .active_bitboard
        .into_iter()
        .zip(board.opponent_bitboard.into_iter());
    for cell in cells {
        encoded.push(match cell {
            (true, _) => player.to_char(),
            (false, true) => (!player).to_char(),
            (false, false) => EMPTY_CELL,
        });
    }

    encoded.push(' ');
    encoded.push(player.to_char());
    encoded.push(';');
    encoded
}

/// Decode an encoding into the board from the perspective of the side to
/// move, and that side.
pub fn decode(encoded: &str) -> Result<(Board, Player), ParseEncodingError> {
    let chars: Vec<char> = encoded.chars().collect();
    if chars.len() != ENCODING_LENGTH {
        return Err(ParseEncodingError::WrongLength(chars.len()));
    }

    if chars[NUM_SPACES] != ' ' {
        return Err(ParseEncodingError::MissingSeparator);
    }

    let side_char = chars[NUM_SPACES + 1];
    let player = Player::from_char(side_char).ok_or(ParseEncodingError::InvalidSide(side_char))?;

    if chars[NUM_SPACES + 2] != ';' {
        return Err(ParseEncodingError::MissingTerminator);
    }

    let mut black = 0u64;
    let mut white = 0u64;
    for (index, &cell) in chars[..NUM_SPACES].iter().enumerate() {
        match cell {
            'X' => black |= 1 << index,
            'O' => white |= 1 << index,
            EMPTY_CELL => (),
            found => return Err(ParseEncodingError::InvalidCell { index, found }),
        }
    }

    let (active, opponent) = match player {
        Player::Black => (black, white),
        Player::White => (white, black),
    };

    Ok((
        Board::from_bitboards(Bitboard::from(active), Bitboard::from(opponent)),
        player,
    ))
}
