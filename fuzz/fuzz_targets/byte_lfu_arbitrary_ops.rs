#![no_main]

use libfuzzer_sys::fuzz_target;
use strcache::{ByteLfuCore, CacheError};

// Fuzz arbitrary operation sequences on ByteLfuCore
//
// Each step is three bytes: operation, key, value length. Byte accounting and
// index invariants are checked after every step.
fuzz_target!(|data: &[u8]| {
    let Some((&capacity, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(capacity % 64);
    let mut cache = ByteLfuCore::new(capacity);

    for step in ops.chunks_exact(3) {
        let key = (step[1] % 24).to_string();
        let len = usize::from(step[2] % 80);
        match step[0] % 4 {
            0 | 1 => {
                let value = vec![step[2]; len];
                match cache.set(&key, &value) {
                    Ok(()) => assert_eq!(&*cache.get(&key).unwrap(), &value[..]),
                    Err(CacheError::NoSpace { needed, .. }) => assert!(needed > capacity),
                    Err(err) => panic!("unexpected error: {err}"),
                }
            }
            2 => {
                let before = cache.frequency(&key);
                match cache.get(&key) {
                    Ok(_) => assert_eq!(cache.frequency(&key), before.map(|s| s + 1)),
                    Err(err) => assert!(err.is_not_found() && before.is_none()),
                }
            }
            _ => {
                let had = cache.contains(&key);
                assert_eq!(cache.del(&key).is_ok(), had);
            }
        }

        assert!(cache.size() <= capacity);
        if let Err(err) = cache.check_invariants() {
            panic!("invariant violated: {err}");
        }
    }
});
