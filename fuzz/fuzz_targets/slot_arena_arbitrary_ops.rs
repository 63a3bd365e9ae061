#![no_main]

use libfuzzer_sys::fuzz_target;
use strcache::ds::SlotArena;

// Fuzz arbitrary operation sequences on SlotArena
//
// Every handle ever issued is kept, so removed handles are probed for
// staleness after their slot has been reused.
fuzz_target!(|data: &[u8]| {
    let mut arena: SlotArena<u32> = SlotArena::new();
    let mut all_ids = Vec::new();
    let mut live = 0usize;

    for pair in data.chunks_exact(2) {
        let (op, value) = (pair[0] % 5, u32::from(pair[1]));
        match op {
            0 | 1 => {
                let id = arena.insert(value);
                all_ids.push((id, Some(value)));
                live += 1;
                assert_eq!(arena.get(id), Some(&value));
            }
            2 => {
                if !all_ids.is_empty() {
                    let idx = value as usize % all_ids.len();
                    let (id, expected) = all_ids[idx];
                    assert_eq!(arena.remove(id), expected);
                    if expected.is_some() {
                        live -= 1;
                        all_ids[idx].1 = None;
                    }
                    assert!(!arena.contains(id));
                }
            }
            3 => {
                if !all_ids.is_empty() {
                    let (id, expected) = all_ids[value as usize % all_ids.len()];
                    assert_eq!(arena.get(id).copied(), expected);
                }
            }
            _ => {
                if value % 16 == 0 {
                    arena.clear();
                    for entry in &mut all_ids {
                        entry.1 = None;
                    }
                    live = 0;
                }
            }
        }
        assert_eq!(arena.len(), live);
        assert_eq!(arena.iter().count(), live);
    }
});
