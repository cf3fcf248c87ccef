//! Miscellaneous project utilities.

use crate::EDGE_LENGTH;
use std::fmt::{self, Formatter};
use std::iter::Iterator;

/// Format 64 characters into a grid, rank 1 at the top.
/// `cells` must yield exactly 64 items, starting from A1.
pub fn format_grid<T: Iterator<Item = char>>(mut cells: T, f: &mut Formatter) -> fmt::Result {
    write!(f, "  a b c d e f g h")?;

    for rank in 1..=EDGE_LENGTH {
        write!(f, "\n{}", rank)?;
        for _ in 0..EDGE_LENGTH {
            write!(f, " {}", cells.next().ok_or(fmt::Error)?)?;
        }
    }

    match cells.next() {
        None => Ok(()),
        _ => Err(fmt::Error),
    }
}
