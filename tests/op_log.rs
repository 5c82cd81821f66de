//! Replays recorded operation logs against a `KvStore` and a sorted
//! association list, checking every answer.
//!
//! A log is whitespace separated: an operation count, then one operation per
//! line. `0 key` looks a key up, `1 key value` stores a value, `2 key` erases
//! a key, `3 n` looks up the n-th key and `4 n` erases it (n is one-based).

use pretty_assertions::assert_eq;
use ostrie::KvStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Lookup(Vec<u8>),
    Insert(Vec<u8>, Vec<u8>),
    Erase(Vec<u8>),
    LookupN(usize),
    EraseN(usize),
}

fn parse_log(text: &str) -> Vec<Op> {
    let mut tokens = text.split_ascii_whitespace();
    let mut next = |what: &str| tokens.next().unwrap_or_else(|| panic!("log truncated, expected {what}"));

    let count: usize = next("count").parse().expect("count");
    (0..count)
        .map(|_| match next("opcode") {
            "0" => Op::Lookup(next("key").as_bytes().to_vec()),
            "1" => {
                let key = next("key").as_bytes().to_vec();
                Op::Insert(key, next("value").as_bytes().to_vec())
            }
            "2" => Op::Erase(next("key").as_bytes().to_vec()),
            "3" => Op::LookupN(next("rank").parse().expect("rank")),
            "4" => Op::EraseN(next("rank").parse().expect("rank")),
            other => panic!("unknown opcode {other:?}"),
        })
        .collect()
}

/// The reference: entries kept sorted by key in a plain vector.
#[derive(Default)]
struct SortedList {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl SortedList {
    fn position(&self, key: &[u8]) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.as_slice().cmp(key))
    }

    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.position(key).ok().map(|i| &self.entries[i].1[..])
    }

    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> bool {
        match self.position(&key) {
            Ok(i) => {
                self.entries[i].1 = value;
                true
            }
            Err(i) => {
                self.entries.insert(i, (key, value));
                false
            }
        }
    }

    fn remove(&mut self, key: &[u8]) -> bool {
        self.position(key).map(|i| self.entries.remove(i)).is_ok()
    }

    fn nth(&self, rank: usize) -> Option<(Vec<u8>, &[u8])> {
        let (key, value) = self.entries.get(rank.checked_sub(1)?)?;
        Some((key.clone(), &value[..]))
    }

    fn remove_nth(&mut self, rank: usize) -> bool {
        match rank.checked_sub(1) {
            Some(index) if index < self.entries.len() => {
                self.entries.remove(index);
                true
            }
            _ => false,
        }
    }
}

fn replay(ops: &[Op]) -> KvStore {
    let mut store = KvStore::new();
    let mut reference = SortedList::default();

    for (line, op) in ops.iter().enumerate() {
        match op {
            Op::Lookup(key) => {
                assert_eq!(store.get(key).unwrap(), reference.get(key), "op {line}: {op:?}");
            }
            Op::Insert(key, value) => {
                let overwrote = reference.insert(key.clone(), value.clone());
                assert_eq!(store.put(key, value).unwrap(), overwrote, "op {line}: {op:?}");
                assert_eq!(store.get(key).unwrap(), Some(&value[..]), "op {line}: {op:?}");
            }
            Op::Erase(key) => {
                assert_eq!(store.delete(key).unwrap(), reference.remove(key), "op {line}: {op:?}");
                assert_eq!(store.get(key).unwrap(), None, "op {line}: {op:?}");
            }
            Op::LookupN(rank) => {
                assert_eq!(store.get_by_rank(*rank), reference.nth(*rank), "op {line}: {op:?}");
            }
            Op::EraseN(rank) => {
                let erased = reference.nth(*rank).map(|(key, _)| key);
                assert_eq!(store.delete_by_rank(*rank), reference.remove_nth(*rank), "op {line}: {op:?}");
                if let Some(key) = erased {
                    assert_eq!(store.get(&key).unwrap(), None, "op {line}: {op:?}");
                }
            }
        }
        assert_eq!(store.len(), reference.entries.len(), "op {line}: {op:?}");
    }

    let stored: Vec<(Vec<u8>, Vec<u8>)> = store.iter().map(|(k, v)| (k, v.to_vec())).collect();
    assert_eq!(stored, reference.entries);
    store
}

#[test]
fn replays_recorded_log() {
    let ops = parse_log(include_str!("data/ops_small.txt"));
    assert_eq!(ops.len(), 400);
    let store = replay(&ops);
    assert_eq!(store.len(), 85);
}

#[test]
fn parses_every_opcode() {
    let ops = parse_log("5\n1 ab xy\n0 ab\n3 1\n4 1\n2 ab\n");
    assert_eq!(
        ops,
        vec![
            Op::Insert(b"ab".to_vec(), b"xy".to_vec()),
            Op::Lookup(b"ab".to_vec()),
            Op::LookupN(1),
            Op::EraseN(1),
            Op::Erase(b"ab".to_vec()),
        ]
    );
    assert!(replay(&ops).is_empty());
}

#[test]
fn out_of_range_ranks_miss_on_both_sides() {
    let ops = parse_log("6\n3 1\n4 0\n1 Q v\n3 2\n4 2\n3 0\n");
    assert_eq!(replay(&ops).len(), 1);
}

/// A longer log from a fixed-seed generator, exercising deep shared prefixes.
#[test]
fn replays_generated_log() {
    const LETTERS: &[u8] = b"aAbBzZ";
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: usize| {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        usize::try_from(state >> 33).unwrap() % bound
    };

    let mut ops = Vec::new();
    let mut live = 0usize;
    for _ in 0..5_000 {
        let key: Vec<u8> = (0..1 + next(8)).map(|_| LETTERS[next(LETTERS.len())]).collect();
        ops.push(match next(10) {
            0..=3 => {
                live += 1;
                Op::Insert(key, vec![b'0' + u8::try_from(next(10)).unwrap(); 1 + next(16)])
            }
            4 | 5 => Op::Lookup(key),
            6 => Op::Erase(key),
            7 | 8 => Op::LookupN(1 + next(live + 2)),
            _ => Op::EraseN(1 + next(live + 2)),
        });
    }
    replay(&ops);
}
