//! Squares on the board and sets of them.

use crate::bitboard::Bitboard;
use crate::{EDGE_LENGTH, NUM_SPACES};
use derive_more::{Display, Error, From, Into};
use std::fmt::{self, Formatter};

/// One square, stored as a one-hot [`Bitboard`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Into)]
pub struct Location(Bitboard);

/// A set of squares. Iterating yields them from A1 upward, so move lists come
/// out in square-index order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, From, Into)]
pub struct LocationList(Bitboard);

#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
#[display(fmt = "expected a square like \"f5\"")]
pub struct ParseLocationError;

impl Location {
    /// Square `index` in row-major order: 0 is A1, 7 is H1, 63 is H8.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        assert!((index as usize) < NUM_SPACES, "square {} is off the board", index);
        Self(Bitboard::from(1u64 << index))
    }

    #[inline]
    pub fn to_index(self) -> u8 {
        u64::from(self.0).trailing_zeros() as u8
    }

    /// Square on rank `row + 1` and file `col` (0 is the A file).
    pub fn from_coords(row: usize, col: usize) -> Self {
        assert!(row < EDGE_LENGTH && col < EDGE_LENGTH);
        Self::from_index((row * EDGE_LENGTH + col) as u8)
    }

    /// (row, column), the inverse of [`Location::from_coords`].
    pub fn to_coords(self) -> (usize, usize) {
        let index = self.to_index() as usize;
        (index / EDGE_LENGTH, index % EDGE_LENGTH)
    }

    #[inline]
    pub fn to_onehot(self) -> Bitboard {
        self.0
    }
}

/// Lowercase algebraic notation: "f5".
impl fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (row, col) = self.to_coords();
        write!(f, "{}{}", (b'a' + col as u8) as char, row + 1)
    }
}

/// Parse algebraic notation. The file letter may be uppercase ("F5").
impl std::str::FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[file, rank] => {
                let col = file.to_ascii_lowercase().wrapping_sub(b'a') as usize;
                let row = rank.wrapping_sub(b'1') as usize;
                if col < EDGE_LENGTH && row < EDGE_LENGTH {
                    Ok(Self::from_coords(row, col))
                } else {
                    Err(ParseLocationError)
                }
            }
            _ => Err(ParseLocationError),
        }
    }
}

impl LocationList {
    #[inline]
    pub fn contains(self, loc: Location) -> bool {
        !(self.0 & loc.to_onehot()).is_empty()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }
}

impl Iterator for LocationList {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        if self.0.is_empty() {
            return None;
        }

        let lowest = Location::from_index(u64::from(self.0).trailing_zeros() as u8);
        self.0 ^= lowest.to_onehot();
        Some(lowest)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_occupied() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for LocationList {}

/// "[d3, f5]"
impl fmt::Display for LocationList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let list = *self;
        write!(f, "[")?;
        for (i, loc) in list.enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", loc)?;
        }
        write!(f, "]")
    }
}
