//! Lookups in a precomputed table of game-theoretic values.
//!
//! The table maps canonical positions to one of five [`Category`]s, scored for
//! the player to move. Keys are 16 characters: each packs four consecutive
//! squares (empty 0, mover 1, opponent 2) as one base-81 digit. On disk, the
//! table is a file of fixed-width `<key>,<digit>\n` records sorted by key.

use cascade_othello::{Board, Location};
use derive_more::{Display, Error};
use log::{debug, info};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

/// Number of characters in a table key.
pub const KEY_LENGTH: usize = 16;

/// Bytes in one on-disk record: key, comma, digit and newline.
pub const RECORD_LENGTH: usize = KEY_LENGTH + 3;

const KEY_ALPHABET: &[u8; 81] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-./:;<=>?@";

/// Bounds on the final score of a position, for the player to move.
/// Ordered from best to worst.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Category {
    #[display(fmt = "in [+2, +64]")]
    Win,
    #[display(fmt = "in [0, +64]")]
    WinOrDraw,
    #[display(fmt = "= 0")]
    Draw,
    #[display(fmt = "in [-64, 0]")]
    LossOrDraw,
    #[display(fmt = "in [-64, -2]")]
    Loss,
}

impl Category {
    /// Parse a table digit: 0 is a win, 4 a loss.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(Category::Win),
            b'1' => Some(Category::WinOrDraw),
            b'2' => Some(Category::Draw),
            b'3' => Some(Category::LossOrDraw),
            b'4' => Some(Category::Loss),
            _ => None,
        }
    }

    pub fn to_digit(self) -> char {
        match self {
            Category::Win => '0',
            Category::WinOrDraw => '1',
            Category::Draw => '2',
            Category::LossOrDraw => '3',
            Category::Loss => '4',
        }
    }

    /// The same bounds seen by the other player.
    pub fn negate(self) -> Self {
        match self {
            Category::Win => Category::Loss,
            Category::WinOrDraw => Category::LossOrDraw,
            Category::Draw => Category::Draw,
            Category::LossOrDraw => Category::WinOrDraw,
            Category::Loss => Category::Win,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum TableError {
    #[display(fmt = "table I/O failed: {}", _0)]
    Io(io::Error),

    /// The file does not consist of whole records.
    #[display(fmt = "table size {} is not a multiple of {}", _0, RECORD_LENGTH)]
    Truncated(#[error(not(source))] u64),

    #[display(fmt = "corrupt table record {}", _0)]
    CorruptRecord(#[error(not(source))] u64),

    #[display(fmt = "unknown category {:?}", _0)]
    BadCategory(#[error(not(source))] char),
}

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> Self {
        TableError::Io(err)
    }
}

/// Encode a board (seen by the player to move) as a table key.
/// Callers canonicalize first.
pub fn encode_key(board: Board) -> String {
    let cells: Vec<usize> = board
        .active_bitboard
        .into_iter()
        .zip(board.opponent_bitboard.into_iter())
        .map(|cell| match cell {
            (true, _) => 1,
            (false, true) => 2,
            (false, false) => 0,
        })
        .collect();

    cells
        .chunks(4)
        .map(|quad| KEY_ALPHABET[quad.iter().fold(0, |acc, &c| acc * 3 + c)] as char)
        .collect()
}

/// A read-only store of table entries.
pub trait TableStore {
    /// Look up a key. `Ok(None)` means the table has no entry for it.
    fn lookup(&self, key: &str) -> Result<Option<Category>, TableError>;
}

/// A table file queried by binary search over its fixed-width records.
#[derive(Debug)]
pub struct SortedTableFile {
    file: Mutex<File>,
    num_records: u64,
}

impl SortedTableFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        if size % RECORD_LENGTH as u64 != 0 {
            return Err(TableError::Truncated(size));
        }

        Ok(Self {
            file: Mutex::new(file),
            num_records: size / RECORD_LENGTH as u64,
        })
    }

    pub fn len(&self) -> u64 {
        self.num_records
    }

    pub fn is_empty(&self) -> bool {
        self.num_records == 0
    }

    fn read_record(file: &mut File, index: u64) -> Result<[u8; RECORD_LENGTH], TableError> {
        let mut record = [0u8; RECORD_LENGTH];
        file.seek(SeekFrom::Start(index * RECORD_LENGTH as u64))?;
        file.read_exact(&mut record)?;

        if record[KEY_LENGTH] != b',' || record[RECORD_LENGTH - 1] != b'\n' {
            return Err(TableError::CorruptRecord(index));
        }
        Ok(record)
    }
}

impl TableStore for SortedTableFile {
    fn lookup(&self, key: &str) -> Result<Option<Category>, TableError> {
        let key = key.as_bytes();
        if key.len() != KEY_LENGTH {
            return Ok(None);
        }

        // Every read seeks first, so a poisoned handle is still usable.
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };

        let (mut lo, mut hi) = (0, self.num_records);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let record = Self::read_record(&mut file, mid)?;
            match record[..KEY_LENGTH].cmp(key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => {
                    let digit = record[KEY_LENGTH + 1];
                    return Category::from_digit(digit)
                        .map(Some)
                        .ok_or(TableError::BadCategory(digit as char));
                }
            }
        }

        Ok(None)
    }
}

/// A table held in memory, for small tables and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    entries: Vec<(String, Category)>,
}

impl MemoryTable {
    pub fn new(entries: impl IntoIterator<Item = (String, Category)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort();
        Self { entries }
    }

    /// Read `<key>,<digit>` lines. Lines need not be sorted.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, TableError> {
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let (key, digit) = match line.split_once(',') {
                Some((key, digit)) if key.len() == KEY_LENGTH && digit.len() == 1 => (key, digit),
                _ => return Err(TableError::CorruptRecord(index as u64)),
            };

            let digit = digit.as_bytes()[0];
            let category =
                Category::from_digit(digit).ok_or(TableError::BadCategory(digit as char))?;
            entries.push((key.to_string(), category));
        }

        Ok(Self::new(entries))
    }
}

impl TableStore for MemoryTable {
    fn lookup(&self, key: &str) -> Result<Option<Category>, TableError> {
        Ok(self
            .entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|index| self.entries[index].1))
    }
}

/// A move picked from the table, and the outcome it guarantees the mover.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TableChoice {
    pub location: Location,
    pub outcome: Category,
}

/// The logged verdict on one reply: its outcome for the player to move, if tabled.
fn verdict(mv: Location, outcome: Option<Category>) -> String {
    let value = match outcome {
        Some(outcome) => outcome.to_string(),
        None => "is unknown".to_string(),
    };
    format!(
        "game-theoretic value (for the player to move) of choosing {} {}",
        mv, value
    )
}

/// Pick the reply with the best tabled outcome for the player to move.
/// Ties go to the reply found first. Returns `None` if no reply is in the table.
pub fn best_move_from_table<T: TableStore + ?Sized>(
    table: &T,
    board: Board,
) -> Result<Option<TableChoice>, TableError> {
    let mut best: Option<TableChoice> = None;

    for mv in board.get_moves() {
        let reply = board.apply_move(mv);
        if reply.is_finished() {
            debug!("{} ends the game, not in the table", mv);
            continue;
        }

        // After a pass the tabled position is ours again, so its score is too.
        let (reply, passed) = reply.resolve_pass();
        let key = encode_key(reply.canonical());
        let outcome = table
            .lookup(&key)?
            .map(|category| if passed { category } else { category.negate() });
        info!("{}", verdict(mv, outcome));
        let outcome = match outcome {
            Some(outcome) => outcome,
            None => continue,
        };

        if best.map_or(true, |best| outcome < best.outcome) {
            best = Some(TableChoice {
                location: mv,
                outcome,
            });
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_othello::GameRecord;
    use std::io::Write;

    fn position(record: &str) -> Board {
        record.parse::<GameRecord>().unwrap().replay().unwrap().0
    }

    fn loc(s: &str) -> Location {
        s.parse().unwrap()
    }

    fn reply_key(board: Board, mv: &str) -> String {
        encode_key(board.apply_move(loc(mv)).resolve_pass().0.canonical())
    }

    #[test]
    fn keys_pack_four_squares_per_character() {
        let key = encode_key(Board::new());
        assert_eq!(key.len(), KEY_LENGTH);
        // d4 (opponent) ends one group, e4 (mover) starts the next.
        assert_eq!(key, "0000002R1s000000");
    }

    #[test]
    fn alphabet_has_no_separator() {
        assert!(!KEY_ALPHABET.contains(&b','));
        let mut sorted = KEY_ALPHABET.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 81);
    }

    #[test]
    fn categories_negate() {
        assert_eq!(Category::Win.negate(), Category::Loss);
        assert_eq!(Category::WinOrDraw.negate(), Category::LossOrDraw);
        assert_eq!(Category::Draw.negate(), Category::Draw);
        assert!(Category::Win < Category::Draw);
        assert_eq!(Category::from_digit(b'3'), Some(Category::LossOrDraw));
        assert_eq!(Category::from_digit(b'5'), None);
    }

    #[test]
    fn verdicts_name_the_player_to_move() {
        let mv: Location = "d6".parse().unwrap();
        assert_eq!(
            verdict(mv, Some(Category::WinOrDraw)),
            "game-theoretic value (for the player to move) of choosing d6 in [0, +64]"
        );
        assert_eq!(
            verdict(mv, None),
            "game-theoretic value (for the player to move) of choosing d6 is unknown"
        );
    }

    #[test]
    fn single_draw_entry_is_chosen() {
        let board = position("f5");
        let table = MemoryTable::new(vec![(reply_key(board, "d6"), Category::Draw)]);

        let choice = best_move_from_table(&table, board).unwrap();
        assert_eq!(
            choice,
            Some(TableChoice {
                location: loc("d6"),
                outcome: Category::Draw
            })
        );
    }

    #[test]
    fn best_outcome_for_the_mover_wins() {
        let board = position("f5");
        let table = MemoryTable::new(vec![
            (reply_key(board, "f4"), Category::WinOrDraw),
            (reply_key(board, "d6"), Category::Draw),
            (reply_key(board, "f6"), Category::Loss),
        ]);

        // Black losing after f6 is a win for white.
        let choice = best_move_from_table(&table, board).unwrap().unwrap();
        assert_eq!(choice.location, loc("f6"));
        assert_eq!(choice.outcome, Category::Win);
    }

    #[test]
    fn symmetric_replies_share_an_entry() {
        let board = Board::new();
        let table = MemoryTable::new(vec![(reply_key(board, "f5"), Category::WinOrDraw)]);

        // All four openings are equivalent; the first one found is kept.
        let choice = best_move_from_table(&table, board).unwrap().unwrap();
        assert_eq!(choice.location, loc("d3"));
        assert_eq!(choice.outcome, Category::LossOrDraw);
    }

    #[test]
    fn passes_keep_the_tabled_perspective() {
        // White to move: c1 leaves black without a move.
        let board = position("d3c3b3b2f5a3a1");
        assert_eq!(board.get_moves().to_string(), "[b1, c1, e3]");
        assert!(board.apply_move(loc("c1")).resolve_pass().1);

        let table = MemoryTable::new(vec![
            (reply_key(board, "c1"), Category::Win),
            (reply_key(board, "e3"), Category::Loss),
        ]);

        let choice = best_move_from_table(&table, board).unwrap().unwrap();
        assert_eq!(choice.location, loc("c1"));
        assert_eq!(choice.outcome, Category::Win);
    }

    #[test]
    fn empty_table_has_no_data() {
        let table = MemoryTable::default();
        assert_eq!(best_move_from_table(&table, position("f5")).unwrap(), None);
    }

    #[test]
    fn finishing_replies_are_not_looked_up() {
        // f4 wipes out white.
        let board = position("d3c3b3d2e1d6d7e3");
        let table = MemoryTable::new(vec![(reply_key(board, "f4"), Category::Win)]);
        assert_eq!(best_move_from_table(&table, board).unwrap(), None);
    }

    #[test]
    fn sorted_file_lookup() {
        let board = position("f5");
        let entries = [
            ("f4", Category::WinOrDraw),
            ("d6", Category::Draw),
            ("f6", Category::Loss),
        ];
        let mut lines: Vec<String> = entries
            .iter()
            .map(|&(mv, category)| format!("{},{}\n", reply_key(board, mv), category.to_digit()))
            .collect();
        lines.sort();

        let path = std::env::temp_dir().join(format!("cascade-table-{}.csv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(lines.concat().as_bytes()).unwrap();
        drop(file);

        let table = SortedTableFile::open(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.lookup(&reply_key(board, "d6")).unwrap(),
            Some(Category::Draw)
        );
        assert_eq!(table.lookup(&encode_key(Board::new())).unwrap(), None);
        assert_eq!(table.lookup("short").unwrap(), None);

        let choice = best_move_from_table(&table, board).unwrap().unwrap();
        assert_eq!(choice.location, loc("f6"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn truncated_file_is_rejected() {
        let path =
            std::env::temp_dir().join(format!("cascade-table-bad-{}.csv", std::process::id()));
        std::fs::write(&path, "0000000000000000,2").unwrap();
        assert!(matches!(
            SortedTableFile::open(&path),
            Err(TableError::Truncated(18))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn memory_table_from_lines() {
        let text = "zzzzzzzzzzzzzzzz,0\n0000000000000000,3\n";
        let table = MemoryTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(
            table.lookup("0000000000000000").unwrap(),
            Some(Category::LossOrDraw)
        );
        assert!(matches!(
            MemoryTable::from_reader("abc,1\n".as_bytes()),
            Err(TableError::CorruptRecord(0))
        ));
        assert!(matches!(
            MemoryTable::from_reader("0000000000000000,9\n".as_bytes()),
            Err(TableError::BadCategory('9'))
        ));
    }
}
