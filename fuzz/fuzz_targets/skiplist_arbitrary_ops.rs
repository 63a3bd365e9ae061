#![no_main]

use libfuzzer_sys::fuzz_target;
use strcache::ds::{ScoreSkipList, SkipListConfig};

// Fuzz arbitrary operation sequences on ScoreSkipList
//
// Byte pairs pick an operation and an operand. A shadow list of live nodes is
// kept so delete/update can target real (score, key, instant) triples.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let config = SkipListConfig {
        max_level: 1 + usize::from(data[0] % 12),
        probability: 0.25,
        seed: u64::from(data[1]),
    };
    let mut list: ScoreSkipList<u32, u8> = ScoreSkipList::with_config(config);
    let mut next_key: u32 = 0;

    for pair in data[2..].chunks_exact(2) {
        let (op, arg) = (pair[0] % 7, pair[1]);
        match op {
            0 | 1 => {
                let id = list.insert(i64::from(arg % 8), next_key, arg);
                assert_eq!(list.entry(id).map(|e| *e.key), Some(next_key));
                next_key += 1;
            }
            2 => {
                // delete an existing node
                let live: Vec<_> = list
                    .iter()
                    .map(|(_, e)| (e.score, *e.key, e.instant))
                    .collect();
                if !live.is_empty() {
                    let (score, key, instant) = live[usize::from(arg) % live.len()];
                    let before = list.len();
                    assert!(list.delete(score, &key, instant));
                    assert_eq!(list.len(), before - 1);
                }
            }
            3 => {
                // update an existing node
                let live: Vec<_> = list
                    .iter()
                    .map(|(_, e)| (e.score, *e.key, e.instant))
                    .collect();
                if !live.is_empty() {
                    let (score, key, instant) = live[usize::from(arg) % live.len()];
                    let new_score = i64::from(arg % 10);
                    let id = list.update(score, &key, instant, new_score);
                    let entry = id.and_then(|id| list.entry(id));
                    assert_eq!(entry.map(|e| (*e.key, e.score)), Some((key, new_score)));
                }
            }
            4 => {
                // miss: keys at or above next_key are never live
                assert!(!list.delete(0, &next_key, 0));
                assert!(list.update(0, &next_key, 0, 1).is_none());
            }
            5 => {
                let lo = i64::from(arg % 8);
                let hi = lo + i64::from(arg % 3);
                let first = list.first_in_range(lo..=hi).and_then(|id| list.entry(id));
                if let Some(e) = first {
                    assert!((lo..=hi).contains(&e.score));
                }
                let last = list.last_in_range(lo..=hi).and_then(|id| list.entry(id));
                assert_eq!(first.is_some(), last.is_some());
            }
            _ => {
                let lo = i64::from(arg % 8);
                let expected = list.iter().filter(|(_, e)| e.score == lo).count();
                assert_eq!(list.delete_range_by_score(lo..=lo), expected);
            }
        }

        if let Err(err) = list.check_invariants() {
            panic!("invariant violated: {err}");
        }
    }
});
