//! Perft: count the lines of play of a given length, to check move generation.
//! A pass counts as a ply; a line ends early when neither side can move.
//! Reference counts: http://www.aartbik.com/MISC/reversi.html

use crate::board::Board;
use crate::location::Location;

/// Perft from the starting position.
pub fn run_perft(depth: u64) -> u64 {
    perft(Board::new(), depth)
}

pub fn perft(board: Board, depth: u64) -> u64 {
    count_lines(board, depth, false)
}

/// Perft below each legal move, for tracking down move generation bugs.
pub fn perft_divide(board: Board, depth: u64) -> Vec<(Location, u64)> {
    board
        .get_moves()
        .map(|mv| (mv, perft(board.apply_move(mv), depth.saturating_sub(1))))
        .collect()
}

fn count_lines(board: Board, depth: u64, opponent_passed: bool) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.get_moves();
    match (moves.is_empty(), opponent_passed) {
        (true, true) => 1,
        (true, false) => count_lines(board.pass(), depth - 1, true),
        (false, _) => moves
            .map(|mv| count_lines(board.apply_move(mv), depth - 1, false))
            .sum(),
    }
}
