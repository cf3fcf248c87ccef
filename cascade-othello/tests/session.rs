//! Whole-game checks on the session layer.

use cascade_othello::{codec, Board, GameError, GameRecord, GameSession, GameStatus, Location, Player};
use indicatif::ProgressIterator;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn loc(s: &str) -> Location {
    s.parse().unwrap()
}

#[test]
fn opening_move_from_the_start() {
    let mut session = GameSession::new();
    session.apply_move(loc("f5")).unwrap();

    let (board, player) = codec::decode(session.encoding()).unwrap();
    assert_eq!(player, Player::White);
    assert_eq!(board.count_pieces(), 5);
    assert_eq!(session.record().len(), 1);
    assert_eq!(session.status(), GameStatus::InProgress);
}

#[test]
fn forced_pass_gives_the_same_side_another_move() {
    let record: GameRecord = "d3c3b3b2f5a3a1".parse().unwrap();
    let mut session = GameSession::from_record(record).unwrap();
    assert_eq!(session.side_to_move(), Ok(Player::White));

    session.apply_move(loc("c1")).unwrap();
    assert_eq!(session.side_to_move(), Ok(Player::White));
    assert_eq!(session.record().to_string(), "d3c3b3b2f5a3a1c1");
    assert!(session.encoding().ends_with(" O;"));
    assert_eq!(session.status(), GameStatus::InProgress);
}

#[test]
fn undo_on_an_empty_record() {
    let mut session = GameSession::new();
    assert_eq!(session.undo(), Err(GameError::NothingToUndo));
    assert_eq!(session, GameSession::new());
}

#[test]
fn from_record_rejects_illegal_records() {
    let record: GameRecord = "f5a1".parse().unwrap();
    assert_eq!(
        GameSession::from_record(record),
        Err(GameError::IllegalMove(loc("a1")))
    );
}

/// Play random games by hand, checking the session invariants at every ply.
#[test]
fn random_games_keep_invariants() {
    for seed in (0..200u32).progress() {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let mut session = GameSession::new();
        let mut previous = [None, None];

        while !session.is_finished() {
            let (board, player) = session.position().unwrap();
            assert_eq!(codec::decode(&codec::encode(board, player)), Ok((board, player)));
            assert_eq!(session.check_consistency(), Ok((board, player)));

            let legal = board.get_moves();
            for index in 0..64 {
                let candidate = Location::from_index(index);
                match board.get_flips(candidate) {
                    Ok(flips) => {
                        assert!(legal.contains(candidate));
                        assert!(!flips.is_empty());
                    }
                    Err(err) => {
                        assert!(!legal.contains(candidate));
                        assert_eq!(err, GameError::IllegalMove(candidate));
                    }
                }
            }

            session.apply_random_move_with(&mut rng).unwrap();

            let marks = [
                session.watermark(Player::Black),
                session.watermark(Player::White),
            ];
            for (before, after) in previous.iter().zip(marks.iter()) {
                if let Some(before) = before {
                    assert!(after.map_or(false, |after| after <= *before));
                }
            }
            previous = marks;
        }

        let (board, _) = session.position().unwrap();
        assert!(board.is_finished());
        assert!(!board.pass().has_moves());
        assert_eq!(session.apply_random_move_with(&mut rng), Err(GameError::GameFinished));
    }
}

#[test]
fn finished_iff_nobody_can_move() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut session = GameSession::new();
    while !session.is_finished() {
        let (board, _) = session.position().unwrap();
        assert!(board.has_moves());
        session.apply_random_move_with(&mut rng).unwrap();
    }

    let (board, _) = session.position().unwrap();
    assert!(!board.has_moves() && !board.pass().has_moves());
    assert_ne!(board, Board::new());
}
