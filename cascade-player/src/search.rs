//! Depth-bounded exact search.
//!
//! This is a cheap short-horizon win detector, not an evaluator: a line only
//! gets a score if it reaches the end of the game within the move budget.
//! Passes do not use up the budget.

use arrayvec::ArrayVec;
use cascade_othello::{Board, Location};

/// How the best line out of a position starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Line {
    Move(Location),
    Pass,
    GameOver,
}

/// An exact final score for the player to move, and the line that forces it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Proof {
    pub score: i8,
    pub line: Line,
}

/// Search `depth` moves ahead. Returns `None` if no line reaches the end of
/// the game in time; otherwise the best score the player to move can force
/// among the lines that do.
pub fn search(board: Board, depth: u8) -> Option<Proof> {
    let moves = board.get_moves();
    if moves.is_empty() {
        let passed = board.pass();

        // Both players pass: game ends
        if !passed.has_moves() {
            return Some(Proof {
                score: board.score_winner_gets_empties(),
                line: Line::GameOver,
            });
        }

        // I pass, but my opponent may have moves
        return search(passed, depth).map(|proof| Proof {
            score: -proof.score,
            line: Line::Pass,
        });
    }

    if depth == 0 {
        return None;
    }

    let children: ArrayVec<[(Location, Board); 64]> =
        moves.map(|mv| (mv, board.apply_move(mv))).collect();

    let mut best: Option<Proof> = None;
    for (mv, child) in children {
        // Lines that run past the horizon say nothing about this move.
        let score = match search(child, depth - 1) {
            Some(proof) => -proof.score,
            None => continue,
        };

        if best.map_or(true, |best| score > best.score) {
            best = Some(Proof {
                score,
                line: Line::Move(mv),
            });
        }
    }

    best
}

/// Look for a move that forces a win within `depth` moves.
/// Returns the final score and the move only if the score is positive.
pub fn search_root(board: Board, depth: u8) -> Option<(i8, Location)> {
    match search(board, depth) {
        Some(Proof {
            score,
            line: Line::Move(mv),
        }) if score > 0 => Some((score, mv)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_othello::GameRecord;
    use rand::rngs::StdRng;
    use rand::seq::IteratorRandom;
    use rand::SeedableRng;

    fn position(record: &str) -> Board {
        record.parse::<GameRecord>().unwrap().replay().unwrap().0
    }

    /// Full-depth negamax, for comparison.
    fn solve(board: Board) -> i8 {
        let moves = board.get_moves();
        if moves.is_empty() {
            if !board.pass().has_moves() {
                return board.score_winner_gets_empties();
            }
            return -solve(board.pass());
        }

        moves.map(|mv| -solve(board.apply_move(mv))).max().unwrap()
    }

    #[test]
    fn no_proof_from_the_start() {
        assert_eq!(search(Board::new(), 3), None);
        assert_eq!(search_root(Board::new(), 3), None);
    }

    #[test]
    fn zero_depth_is_unknown() {
        assert_eq!(search(position("f5d6"), 0), None);
    }

    #[test]
    fn finds_an_immediate_wipeout() {
        let board = position("d3c3b3d2e1d6d7e3");
        let f4 = "f4".parse().unwrap();
        assert_eq!(search_root(board, 1), Some((64, f4)));
    }

    #[test]
    fn deeper_search_prefers_the_first_best_move() {
        let board = position("d3c3b3d2e1d6d7e3");
        let f2 = "f2".parse().unwrap();
        assert_eq!(search_root(board, 3), Some((64, f2)));
    }

    #[test]
    fn finished_positions_score_directly() {
        let board = position("d3c3b3d2e1d6d7e3f4");
        assert_eq!(
            search(board, 0),
            Some(Proof {
                score: -64,
                line: Line::GameOver
            })
        );
    }

    #[test]
    fn passing_negates_the_score() {
        // Black to move with no legal move; white still has e3 and f6.
        let board = position("d3c3b3b2f5a3a1").apply_move("c1".parse().unwrap());
        assert!(!board.has_moves());

        for depth in 0..4 {
            let direct = search(board, depth);
            let passed = search(board.pass(), depth);
            assert_eq!(direct.map(|p| p.score), passed.map(|p| -p.score));
            if let Some(proof) = direct {
                assert_eq!(proof.line, Line::Pass);
            }
        }
    }

    #[test]
    fn matches_full_solve_near_the_end() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let mut board = Board::new();
            while board.count_empties() > 7 && !board.is_finished() {
                let (next, _) = board
                    .apply_move(board.get_moves().choose(&mut rng).unwrap())
                    .resolve_pass();
                board = next;
            }
            if board.is_finished() {
                continue;
            }

            let proof = search(board, board.count_empties()).unwrap();
            assert_eq!(proof.score, solve(board));
        }
    }
}
