//! Low-level bitboard operations.
//!
//! For efficiency, [`Bitboard`] operations are unchecked and may produce
//! inconsistent state if invalid data is passed.
//!
//! Under the hood, all these operations work on u64 bitboards. By convention,
//! bit `i` is square `i` in row-major order: A1 is the LSB, H1 is bit 7 and
//! H8 is the MSB.

use crate::{utils, NUM_SPACES};
use derive_more::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, From, Into, Not,
};
use std::fmt::{self, Display, Formatter};

/// One bit per square. A newtype so board masks do not mix with plain integers.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    Default,
    From,
    Into,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(u64);

/// Starting bitboard for Black (D5, E4).
pub const BLACK_START: Bitboard = Bitboard(0x0000000810000000);

/// Starting bitboard for White (D4, E5).
pub const WHITE_START: Bitboard = Bitboard(0x0000001008000000);

// Masks selecting everything except the A file and the H file.
const NOT_A_FILE: u64 = 0xfefefefefefefefe;
const NOT_H_FILE: u64 = 0x7f7f7f7f7f7f7f7f;
const FULL_MASK: u64 = 0xffffffffffffffff;

/// A ray direction: a signed shift (positive shifts left) and the mask
/// clearing squares that wrapped around a board edge.
#[derive(Clone, Copy)]
struct Direction(i8, u64);

/// E, W, N, S, NE, NW, SE, SW.
const DIRECTIONS: [Direction; 8] = [
    Direction(1, NOT_A_FILE),
    Direction(-1, NOT_H_FILE),
    Direction(8, FULL_MASK),
    Direction(-8, FULL_MASK),
    Direction(9, NOT_A_FILE),
    Direction(7, NOT_H_FILE),
    Direction(-7, NOT_A_FILE),
    Direction(-9, NOT_H_FILE),
];

impl Direction {
    #[inline]
    fn shift(self, bits: u64) -> u64 {
        let Direction(amount, mask) = self;
        if amount > 0 {
            (bits << amount) & mask
        } else {
            (bits >> -amount) & mask
        }
    }

    /// Smear `seed` along this direction through `through`, keeping only the
    /// contiguous run that starts next to `seed`. A run is at most 6 long.
    #[inline]
    fn run(self, seed: u64, through: u64) -> u64 {
        let mut run = self.shift(seed) & through;
        run |= self.shift(run) & through;
        run |= self.shift(run) & through;
        run |= self.shift(run) & through;
        run |= self.shift(run) & through;
        run |= self.shift(run) & through;
        run
    }
}

impl Display for Bitboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        utils::format_grid(
            self.into_iter().map(|bit| match bit {
                false => '.',
                true => '#',
            }),
            f,
        )
    }
}

impl Bitboard {
    /// Number of set squares.
    #[inline]
    pub fn count_occupied(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Number of unset squares.
    #[inline]
    pub fn count_empty(self) -> u8 {
        self.0.count_zeros() as u8
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return true if square `index` is set.
    #[inline]
    pub fn contains(self, index: u8) -> bool {
        self.0 & (1u64 << index) != 0
    }

    /// Mirror ranks: A1 <-> A8.
    #[inline]
    pub fn flip_vertical(self) -> Self {
        Self(self.0.swap_bytes())
    }

    /// Mirror files: A1 <-> H1.
    #[inline]
    pub fn mirror_horizontal(self) -> Self {
        Self(self.0.reverse_bits().swap_bytes())
    }

    /// Transpose along the A1-H8 diagonal: B1 <-> A2.
    #[inline]
    pub fn flip_diagonal(self) -> Self {
        const K1: u64 = 0x5500550055005500;
        const K2: u64 = 0x3333000033330000;
        const K4: u64 = 0x0f0f0f0f00000000;

        let mut x = self.0;
        let mut t = K4 & (x ^ (x << 28));
        x ^= t ^ (t >> 28);
        t = K2 & (x ^ (x << 14));
        x ^= t ^ (t >> 14);
        t = K1 & (x ^ (x << 7));
        x ^= t ^ (t >> 7);
        Self(x)
    }

    /// All 8 images of this bitboard under the board's rotations and reflections.
    /// The order is fixed, so the same index applies the same transform to
    /// every bitboard.
    pub fn symmetries(self) -> [Self; 8] {
        let transposed = self.flip_diagonal();
        [
            self,
            self.flip_vertical(),
            self.mirror_horizontal(),
            self.mirror_horizontal().flip_vertical(),
            transposed,
            transposed.flip_vertical(),
            transposed.mirror_horizontal(),
            transposed.mirror_horizontal().flip_vertical(),
        ]
    }
}

/// Disc differential for the active player, ignoring empty squares.
#[inline]
pub fn score_absolute_difference(active: Bitboard, opponent: Bitboard) -> i8 {
    active.count_occupied() as i8 - opponent.count_occupied() as i8
}

/// Final disc differential for the active player, with every empty square
/// counted for whoever has more discs. A draw scores 0.
#[inline]
pub fn score_winner_gets_empties(active: Bitboard, opponent: Bitboard) -> i8 {
    let difference = score_absolute_difference(active, opponent);
    let empties = (active | opponent).count_empty() as i8;
    difference + difference.signum() * empties
}

/// Squares where the active player may move: empty squares at the end of a
/// run of opponent discs that starts next to an active disc.
/// The bitboards must be disjoint.
#[inline]
pub fn get_move_mask(active: Bitboard, opponent: Bitboard) -> Bitboard {
    let empties = !(active.0 | opponent.0);

    let moves = DIRECTIONS.iter().fold(0, |moves, &dir| {
        // Opponent runs touching our pieces, then one more step onto an empty.
        moves | (dir.shift(dir.run(active.0, opponent.0)) & empties)
    });

    Bitboard(moves)
}

/// Compute the pieces flipped when the active player plays `move_mask`,
/// which must be a one-hot bitboard. Returns an empty bitboard if the move
/// flips nothing, which is exactly when it is illegal on an empty square.
#[inline]
pub fn get_flips(active: Bitboard, opponent: Bitboard, move_mask: Bitboard) -> Bitboard {
    let flips = DIRECTIONS.iter().fold(0, |flips, &dir| {
        let run = dir.run(move_mask.0, opponent.0);
        // A run only flips if it is capped by one of our pieces.
        if dir.shift(run) & active.0 != 0 {
            flips | run
        } else {
            flips
        }
    });

    Bitboard(flips)
}

/// Play `move_mask` (one-hot, and legal) for the active player.
/// Returns the new (active, opponent) bitboards without swapping sides.
#[inline]
pub fn apply_move(
    active: Bitboard,
    opponent: Bitboard,
    move_mask: Bitboard,
) -> (Bitboard, Bitboard) {
    let flips = get_flips(active, opponent, move_mask);
    (active | flips | move_mask, opponent ^ flips)
}

/// Yields one `bool` per square, from A1 to H8.
#[derive(Clone, Copy, Debug)]
pub struct Bits {
    square: usize,
    bits: Bitboard,
}

impl Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.square == NUM_SPACES {
            return None;
        }

        let bit = self.bits.contains(self.square as u8);
        self.square += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = NUM_SPACES - self.square;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits {}

/// Iterate over the bits in row-major order, starting from A1.
impl IntoIterator for Bitboard {
    type Item = bool;
    type IntoIter = Bits;

    fn into_iter(self) -> Self::IntoIter {
        Bits {
            square: 0,
            bits: self,
        }
    }
}
